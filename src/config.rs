//! Runtime configuration for the demo binary, read from the environment.
use std::{env, path::PathBuf};

use crate::game::GameConfig;
#[cfg(feature = "images")]
use crate::sprite::{FRAME_HEIGHT, FRAME_WIDTH};

/// Settings for a run of the demo.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub fps: u32,
    pub game: GameConfig,
    /// Seed for the random events. Unset means a fresh seed every run.
    pub seed: Option<u64>,
    /// Show the trap and player state on the top line.
    pub show_debug: bool,
    pub log_dir: PathBuf,
    /// Image to read the frames from instead of the built-in ones.
    #[cfg(feature = "images")]
    pub atlas_path: Option<PathBuf>,
    /// Size of one frame in the atlas image, in pixels.
    #[cfg(feature = "images")]
    pub frame_size: (u16, u16),
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            game: GameConfig::default(),
            seed: None,
            show_debug: false,
            log_dir: PathBuf::from("logs"),
            #[cfg(feature = "images")]
            atlas_path: None,
            #[cfg(feature = "images")]
            frame_size: (FRAME_WIDTH, FRAME_HEIGHT),
        }
    }
}

impl DemoConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ISO_FPS` - Target frames per second (default: 30)
    /// - `ISO_MAP_WIDTH` - Map width in tiles (default: 5)
    /// - `ISO_MAP_HEIGHT` - Map height in tiles (default: 5)
    /// - `ISO_SEED` - Seed for tile drops and trap strikes (default: random)
    /// - `ISO_DEBUG` - Show the debug status line (default: false)
    /// - `ISO_LOG_DIR` - Directory for the log file (default: `logs`)
    /// - `ISO_ATLAS` - Atlas image path, with the `images` feature (default: built-in frames)
    /// - `ISO_FRAME_WIDTH` / `ISO_FRAME_HEIGHT` - Atlas frame size, with the `images`
    ///   feature (default: 16 x 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(fps) = read_env::<u32>("ISO_FPS") {
            config.fps = fps.clamp(1, 240);
        }
        if let Some(width) = read_env::<usize>("ISO_MAP_WIDTH") {
            config.game.map_width = width;
        }
        if let Some(height) = read_env::<usize>("ISO_MAP_HEIGHT") {
            config.game.map_height = height;
        }
        config.seed = read_env("ISO_SEED");
        if let Some(show) = read_env_bool("ISO_DEBUG") {
            config.show_debug = show;
        }
        if let Ok(dir) = env::var("ISO_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        #[cfg(feature = "images")]
        {
            config.atlas_path = env::var("ISO_ATLAS").ok().map(PathBuf::from);
            if let Some(width) = read_env::<u16>("ISO_FRAME_WIDTH") {
                config.frame_size.0 = width;
            }
            if let Some(height) = read_env::<u16>("ISO_FRAME_HEIGHT") {
                config.frame_size.1 = height;
            }
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
