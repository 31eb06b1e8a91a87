//! Internal helpers for keeping track of units.
//! Using pixels when cells are expected is a no no.
//!
//! Units used in this crate:
//!
//! Screen pixel x/y position/length: u16
//! Screen cell x/y position/length: u16
//! Sprite pixel x/y position/length: u16
//! Screen cell index/length, sprite texel index/length: usize
//! Subcell pixel x/y position: u8
//! World position (tiles, with z in pixels): f32

use crate::cell::{PIXEL_HEIGHT, PIXEL_WIDTH};

/// Computes an array length from its (x, y) dimensions.
pub(crate) const fn cell_length(width: u16, height: u16) -> usize {
    width as usize * height as usize
}

/// Number of cells needed to hold `px` pixels along an axis `per_cell` pixels wide.
pub(crate) const fn cells_for(px: u16, per_cell: u8) -> u16 {
    px.div_ceil(per_cell as u16)
}

/// Splits a screen pixel position into cell and subcell components:
/// `((cell x, subcell x), (cell y, subcell y))`.
pub(crate) const fn pos_components(x: u16, y: u16) -> ((u16, u8), (u16, u8)) {
    (
        (x / PIXEL_WIDTH as u16, (x % PIXEL_WIDTH as u16) as u8),
        (y / PIXEL_HEIGHT as u16, (y % PIXEL_HEIGHT as u16) as u8),
    )
}

/// Converts from a (x, y) position to an array index.
pub(crate) const fn index(x: u16, y: u16, width: u16) -> usize {
    y as usize * width as usize + x as usize
}
