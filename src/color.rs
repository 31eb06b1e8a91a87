//! ANSI terminal colors for sprites and screen cells.
//!
//! Colors are stored as 8-bit ANSI values and handed to the terminal through
//! [`crossterm::style::Color::AnsiValue`].

use crossterm::style;

use crate::cell::Cell;

/// An 8-bit ANSI color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(pub u8);

// Channel levels of the 6x6x6 cube, as most terminals render them.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
const GREY_BASE: u8 = 8;
const GREY_STEP: u8 = 10;
const GREY_STEPS: u8 = 24;

macro_rules! standard_colors {
    ($($num:literal $name:ident $desc:literal),+ $(,)?) => {
        $(
            #[doc = concat!("The ANSI standard ", $desc, " color. Terminal themes may alter it.")]
            pub const $name: Color = Color::new($num);
        )+
    };
}

/// The 16 standard ANSI colors.
pub mod standard {
    use super::Color;

    standard_colors! {
        0 BLACK "black",
        1 RED "red",
        2 GREEN "green",
        3 YELLOW "yellow",
        4 BLUE "blue",
        5 MAGENTA "magenta",
        6 CYAN "cyan",
        7 WHITE "white",
        8 BRIGHT_BLACK "bright black",
        9 BRIGHT_RED "bright red",
        10 BRIGHT_GREEN "bright green",
        11 BRIGHT_YELLOW "bright yellow",
        12 BRIGHT_BLUE "bright blue",
        13 BRIGHT_MAGENTA "bright magenta",
        14 BRIGHT_CYAN "bright cyan",
        15 BRIGHT_WHITE "bright white",
    }
}

fn nearest_level(target: u8) -> u8 {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, &level)| level.abs_diff(target))
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}

fn squared_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x.abs_diff(y) as u32).pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

impl Color {
    pub const fn new(color: u8) -> Self {
        Self(color)
    }

    /// A color from the 6x6x6 cube. Each component is clipped to `0..=5`.
    pub fn from_ansi_components(r: u8, g: u8, b: u8) -> Self {
        Self(16 + r.min(5) * 36 + g.min(5) * 6 + b.min(5))
    }

    /// A step of the 24-entry greyscale ramp, clipped to `0..=23`.
    pub fn from_ansi_greyscale(step: u8) -> Self {
        Self(232 + step.min(GREY_STEPS - 1))
    }

    /// The closest cube or greyscale color to an RGB triplet. The cube wins ties.
    pub fn from_rgb_approximate(r: u8, g: u8, b: u8) -> Self {
        let cube = Self::from_ansi_components(nearest_level(r), nearest_level(g), nearest_level(b));

        let mean = ((r as u16 + g as u16 + b as u16) / 3) as u8;
        let step = (mean.saturating_sub(GREY_BASE) as u16 + GREY_STEP as u16 / 2) / GREY_STEP as u16;
        let grey = Self::from_ansi_greyscale(step.min(u8::MAX as u16) as u8);

        let target = (r, g, b);
        if squared_distance(grey.to_rgb_approximate(), target)
            < squared_distance(cube.to_rgb_approximate(), target)
        {
            grey
        } else {
            cube
        }
    }

    /// The RGB triplet a typical terminal shows for this color.
    pub fn to_rgb_approximate(self) -> (u8, u8, u8) {
        match self.0 {
            0..=15 => {
                let on = if self.0 >= 8 { 255 } else { 128 };
                match self.0 {
                    0 => (0, 0, 0),
                    7 => (192, 192, 192),
                    8 => (128, 128, 128),
                    n => {
                        let bit = |mask: u8| if n & mask != 0 { on } else { 0 };
                        (bit(1), bit(2), bit(4))
                    }
                }
            }
            16..=231 => {
                let i = self.0 - 16;
                (
                    CUBE_LEVELS[(i / 36) as usize],
                    CUBE_LEVELS[(i / 6 % 6) as usize],
                    CUBE_LEVELS[(i % 6) as usize],
                )
            }
            _ => {
                let v = GREY_BASE + (self.0 - 232) * GREY_STEP;
                (v, v, v)
            }
        }
    }

    pub fn to_crossterm_color(self) -> style::Color {
        style::Color::AnsiValue(self.0)
    }
}

/// A [`Cell`] together with the color its lit dots are drawn in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ColoredCell {
    pub cell: Cell,
    pub color: Option<Color>,
}

impl ColoredCell {
    pub fn new(cell: Cell, color: Option<Color>) -> Self {
        Self { cell, color }
    }

    /// ORs the dots of `cell` into this one, keeping the color.
    pub fn merge_cell(&mut self, cell: Cell) {
        self.cell = self.cell | cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_and_ramp_indices() {
        assert_eq!(Color::from_ansi_components(5, 0, 0), Color::new(196));
        assert_eq!(Color::from_ansi_components(0, 5, 0), Color::new(46));
        assert_eq!(Color::from_ansi_components(9, 9, 9), Color::new(231));
        assert_eq!(Color::from_ansi_greyscale(12), Color::new(244));
        assert_eq!(Color::from_ansi_greyscale(u8::MAX), Color::new(255));
    }

    #[test]
    fn nearest_color() {
        // saturated pixels land in the cube, flat greys on the ramp
        assert_eq!(Color::from_rgb_approximate(250, 10, 5), Color::new(196));
        assert_eq!(
            Color::from_rgb_approximate(100, 100, 100),
            Color::from_ansi_greyscale(9)
        );
        let (r, g, b) = Color::from_ansi_components(2, 3, 4).to_rgb_approximate();
        assert_eq!((r, g, b), (135, 175, 215));
        assert_eq!(
            Color::from_rgb_approximate(r, g, b),
            Color::from_ansi_components(2, 3, 4)
        );
    }

    #[test]
    fn standard_rgb() {
        assert_eq!(standard::RED.to_rgb_approximate(), (128, 0, 0));
        assert_eq!(standard::BRIGHT_CYAN.to_rgb_approximate(), (0, 255, 255));
        assert_eq!(standard::WHITE.to_rgb_approximate(), (192, 192, 192));
    }

    #[test]
    fn merge_keeps_color() {
        let mut cell = ColoredCell::new(Cell::new(1), Some(standard::GREEN));
        cell.merge_cell(Cell::new(2));
        assert_eq!(cell, ColoredCell::new(Cell::new(3), Some(standard::GREEN)));
    }
}
