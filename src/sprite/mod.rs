//! Module for manipulating [`Sprite`]s, i.e. rectangular pixel bitmaps with color
//! information, and the [`Atlas`] of frames the game draws from.
mod builtin;
#[cfg(feature = "images")]
mod images;

pub use builtin::*;

use smallvec::{smallvec, SmallVec};

use crate::{
    color::Color,
    error::{Error, Result},
    units::{cell_length, index},
};

/// Stack allocation size for each sprite's texel data. Fits one built-in frame.
const SPRITE_STACK_SIZE: usize = 16 * 32;

/// A single sprite pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Texel {
    /// Leaves whatever is underneath untouched.
    #[default]
    Empty,
    /// Covers whatever is underneath without lighting a dot.
    Mask,
    /// Lights a dot and paints its cell in the given color.
    Ink(Color),
}

impl Texel {
    pub fn is_opaque(self) -> bool {
        !matches!(self, Texel::Empty)
    }
}

type SpriteData = SmallVec<[Texel; SPRITE_STACK_SIZE]>;

/// A sprite made up of a rectangular region of texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    texels: SpriteData,
    width: u16,
    height: u16,
}

impl Sprite {
    /// Create a new empty [`Sprite`] with the given dimensions, in pixels.
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            texels: smallvec![Texel::Empty; cell_length(width, height)],
            width,
            height,
        }
    }

    /// Creates a [`Sprite`] from rows of ASCII art.
    ///
    /// `.` and ` ` are [`Texel::Empty`], `-` is [`Texel::Mask`], and any character
    /// listed in `palette` is [`Texel::Ink`] in its color.
    ///
    /// Returns None if a character is unknown, or if the rows are different lengths.
    pub fn from_rows(rows: &[&str], palette: &[(char, Color)]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return None;
        }
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(rows.len())) else {
            return None;
        };

        let mut texels = SpriteData::with_capacity(cell_length(w, h));
        for row in rows {
            for c in row.chars() {
                let texel = match c {
                    '.' | ' ' => Texel::Empty,
                    '-' => Texel::Mask,
                    _ => {
                        let (_, color) = palette.iter().find(|(key, _)| *key == c)?;
                        Texel::Ink(*color)
                    }
                };
                texels.push(texel);
            }
        }
        Some(Self {
            texels,
            width: w,
            height: h,
        })
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The texel at (x, y), or [`Texel::Empty`] outside the sprite.
    pub fn texel(&self, x: u16, y: u16) -> Texel {
        if x < self.width && y < self.height {
            self.texels[index(x, y, self.width)]
        } else {
            Texel::Empty
        }
    }

    /// Sets the texel at (x, y). **Ignores** out-of-bounds input.
    pub fn set(&mut self, x: u16, y: u16, texel: Texel) {
        if x < self.width && y < self.height {
            let i = index(x, y, self.width);
            self.texels[i] = texel;
        }
    }

    /// Copies the opaque texels of `src` onto this sprite with its top left corner
    /// at (x, y). Parts falling outside this sprite are clipped.
    pub fn stamp(&mut self, src: &Sprite, x: i32, y: i32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                let texel = src.texel(sx, sy);
                if !texel.is_opaque() {
                    continue;
                }
                let (dx, dy) = (x + sx as i32, y + sy as i32);
                if let (Ok(dx), Ok(dy)) = (u16::try_from(dx), u16::try_from(dy)) {
                    self.set(dx, dy, texel);
                }
            }
        }
    }
}

/// Frames addressed by index, all of the same size.
#[derive(Debug, Clone)]
pub struct Atlas {
    frames: Vec<Sprite>,
    frame_width: u16,
    frame_height: u16,
}

impl Atlas {
    /// Builds an atlas from frames. Frames of a different size than the first are
    /// padded or clipped to it.
    pub fn from_frames(frames: Vec<Sprite>) -> Self {
        let (frame_width, frame_height) = frames
            .first()
            .map_or((0, 0), |f| (f.width(), f.height()));
        let frames = frames
            .into_iter()
            .map(|f| {
                if f.width() == frame_width && f.height() == frame_height {
                    f
                } else {
                    let mut resized = Sprite::empty(frame_width, frame_height);
                    resized.stamp(&f, 0, 0);
                    resized
                }
            })
            .collect();
        Self {
            frames,
            frame_width,
            frame_height,
        }
    }

    pub fn frame(&self, index: usize) -> Result<&Sprite> {
        self.frames.get(index).ok_or(Error::MissingFrame {
            index,
            len: self.frames.len(),
        })
    }

    /// Fails with the first missing index unless the atlas holds at least `count`
    /// frames.
    pub fn require_frames(&self, count: usize) -> Result<()> {
        let len = self.frames.len();
        if len < count {
            return Err(Error::MissingFrame { index: len, len });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub const fn frame_size(&self) -> (u16, u16) {
        (self.frame_width, self.frame_height)
    }
}
