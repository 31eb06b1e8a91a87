//! # `iso`
//!
//! `iso` is a small isometric game demo drawn in the terminal.
//!
//! Frames are rendered with unicode Braille characters and ANSI colors. On top of
//! the pixel layer sit an isometric projection with depth ordering, and a set of
//! timed actions (moves and frame animations with a delay, a duration and an
//! easing curve) that drive everything on the map.
pub mod action;
pub mod cell;
pub mod color;
pub mod config;
pub mod easing;
pub mod error;
pub mod event;
pub mod game;
pub mod iso;
pub mod logging;
pub mod screen;
pub mod sprite;
pub(crate) mod units;

pub use error::{Error, Result};
