//! Module for reading an [`Atlas`] out of an image file.

use std::path::Path;

use image::{GenericImageView, Rgba};
use tracing::info;

use super::*;

/// Alpha values above this count as opaque.
const ALPHA_THRESHOLD: u8 = 128;

impl Atlas {
    /// Reads an atlas image and slices it into `frame_width` x `frame_height` frames.
    ///
    /// Frames are numbered row by row: frame `i` is found at column `i % columns`,
    /// row `i / columns` of the frame grid. Any partial frames along the right or
    /// bottom edge are ignored.
    ///
    /// Opaque pixels become [`Texel::Ink`] in the closest ANSI color to the
    /// pixel's RGB value.
    pub fn open<P: AsRef<Path>>(path: P, frame_width: u16, frame_height: u16) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let (width, height) = img.dimensions();

        let columns = width / frame_width.max(1) as u32;
        let rows = height / frame_height.max(1) as u32;
        if columns == 0 || rows == 0 {
            return Err(Error::AtlasTooSmall {
                width,
                height,
                frame_width: frame_width as u32,
                frame_height: frame_height as u32,
            });
        }

        let mut frames = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let x0 = column * frame_width as u32;
                let y0 = row * frame_height as u32;
                let mut sprite = Sprite::empty(frame_width, frame_height);
                for y in 0..frame_height {
                    for x in 0..frame_width {
                        let Rgba([r, g, b, a]) = img.get_pixel(x0 + x as u32, y0 + y as u32);
                        if a > ALPHA_THRESHOLD {
                            sprite.set(x, y, Texel::Ink(Color::from_rgb_approximate(r, g, b)));
                        }
                    }
                }
                frames.push(sprite);
            }
        }

        info!(
            path = %path.display(),
            frames = frames.len(),
            columns,
            rows,
            "loaded atlas image"
        );
        Ok(Atlas::from_frames(frames))
    }
}
