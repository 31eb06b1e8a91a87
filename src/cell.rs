//! Braille cells: the smallest unit the terminal can draw.
//!
//! Every terminal character cell holds one Unicode braille character, which is a
//! 2x4 grid of dots. A [`Cell`] stores those eight dots as bits so that the
//! screen can treat the terminal as a (coarse) pixel framebuffer.

use std::ops::BitOr;

/// The unicode scalar value for the first ("empty") braille codepoint.
pub const BRAILLE_BASE_CODEPOINT: u32 = 0x2800;
/// Every braille codepoint lies in `U+0800..=U+FFFF`, so it always encodes to 3 bytes.
pub const BRAILLE_UTF8_BYTES: usize = 3;
/// Pixels per cell, horizontally.
pub const PIXEL_WIDTH: u8 = 2;
/// Pixels per cell, vertically.
pub const PIXEL_HEIGHT: u8 = 4;

/// Eight pixels packed row by row:
/// ```txt
/// 0 1
/// 2 3
/// 4 5
/// 6 7
/// ```
///
/// Unicode numbers the braille dots column by column instead (with the bottom row
/// tacked on last), so the bits are permuted on output by [`Cell::braille_offset`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct Cell {
    pub bits: u8,
}

impl Cell {
    pub const fn new(bits: u8) -> Self {
        Self { bits }
    }

    /// A cell with every dot lit.
    pub const fn full() -> Self {
        Self { bits: u8::MAX }
    }

    /// The single-pixel cell for pixel (x, y) inside a cell, or `None` when the
    /// position does not fit in a 2x4 block.
    pub const fn from_bit_position(x: u8, y: u8) -> Option<Self> {
        if x < PIXEL_WIDTH && y < PIXEL_HEIGHT {
            Some(Self::new(1 << (y * PIXEL_WIDTH + x)))
        } else {
            None
        }
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Computes the offset of this cell's character from [`BRAILLE_BASE_CODEPOINT`].
    pub const fn braille_offset(self) -> u8 {
        // bits 0, 5, 6 and 7 already sit where Unicode wants them
        (self.bits & 0b1110_0001)
            | ((self.bits & 0b0000_0010) << 2)
            | ((self.bits & 0b0000_0100) >> 1)
            | ((self.bits & 0b0000_1000) << 1)
            | ((self.bits & 0b0001_0000) >> 2)
    }

    /// Encodes the cell as the UTF-8 bytes of its braille character.
    pub fn to_braille_utf8(self) -> [u8; BRAILLE_UTF8_BYTES] {
        let codepoint = BRAILLE_BASE_CODEPOINT + self.braille_offset() as u32;
        let c = char::from_u32(codepoint).unwrap_or('\u{2800}');
        let mut buf = [0; BRAILLE_UTF8_BYTES];
        c.encode_utf8(&mut buf);
        buf
    }
}

impl BitOr for Cell {
    type Output = Cell;

    fn bitor(self, rhs: Self) -> Self::Output {
        Cell::new(self.bits | rhs.bits)
    }
}
