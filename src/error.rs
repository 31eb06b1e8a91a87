//! Error types shared by the renderer, the atlas and the game world.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "images")]
    #[error("failed to read atlas image: {0}")]
    Image(#[from] image::ImageError),

    #[error("atlas has no frame {index} (it holds {len})")]
    MissingFrame { index: usize, len: usize },

    #[error("atlas image is {width}x{height}, smaller than one {frame_width}x{frame_height} frame")]
    AtlasTooSmall {
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("map must be at least 1x1 tiles, got {width}x{height}")]
    EmptyMap { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
