use anyhow::{Context, Result};
use crossterm::terminal;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use iso::{
    config::DemoConfig,
    event::{pressed_direction, Event},
    game::Game,
    iso::{draw_sprites, Camera, TileSize},
    logging::setup_logging,
    screen::{Flow, Screen},
    sprite::Atlas,
};

fn main() -> Result<()> {
    let config = DemoConfig::from_env();
    let _guard = setup_logging(&config.log_dir).context("failed to set up logging")?;
    info!(?config, "starting");

    let atlas = load_atlas(&config)?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(config.game, rng).context("failed to build the map")?;

    let (columns, rows) = terminal::size().context("failed to read the terminal size")?;
    let mut screen = Screen::new_cells(columns, rows);
    let map = game.config();
    // tiles are as wide as a frame; the top face is half as tall
    let (frame_width, _) = atlas.frame_size();
    let tile = TileSize {
        width: frame_width as f32,
        height: frame_width as f32,
    };

    screen
        .start_loop(config.fps, |screen, frame| {
            if frame
                .events
                .iter()
                .any(|e| matches!(e, Event::Esc | Event::Char('q')))
            {
                return Ok(Flow::Exit);
            }
            game.update(frame.dt, pressed_direction(&frame.events));

            let camera = Camera::centered(
                map.map_width,
                map.map_height,
                (screen.pixel_width(), screen.pixel_height()),
                atlas.frame_size(),
                tile,
            );
            screen.clear();
            draw_sprites(screen, &atlas, &camera, &game.sprites())?;
            if config.show_debug {
                screen.set_caption(Some(game.status()));
            } else if game.player_is_gone() {
                screen.set_caption(Some("You fell. Press q to quit.".to_owned()));
            }
            Ok(Flow::Continue)
        })
        .context("frame loop failed")?;

    info!("bye");
    Ok(())
}

#[cfg(feature = "images")]
fn load_atlas(config: &DemoConfig) -> Result<Atlas> {
    use iso::sprite::FRAME_COUNT;

    let Some(path) = &config.atlas_path else {
        return Ok(Atlas::builtin());
    };
    let (frame_width, frame_height) = config.frame_size;
    let atlas = Atlas::open(path, frame_width, frame_height)
        .with_context(|| format!("failed to load atlas {}", path.display()))?;
    atlas
        .require_frames(FRAME_COUNT)
        .with_context(|| format!("atlas {} is missing frames", path.display()))?;
    Ok(atlas)
}

#[cfg(not(feature = "images"))]
fn load_atlas(_config: &DemoConfig) -> Result<Atlas> {
    Ok(Atlas::builtin())
}
