//! The demo world: a player hopping across a floor that falls apart tile by tile
//! while a trap strikes random tiles.
//!
//! [`Game::update`] runs one frame of the script: player input, stepping every
//! entity's actions, then the random events and the checks that send the player
//! down. [`Game::sprites`] returns the frame's draw list in depth order.
mod actions;
mod entity;

pub use actions::*;
pub use entity::*;

use glam::Vec3;
use rand::{rngs::StdRng, Rng};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    action::{FrameAnim, LinearMove, Tween},
    easing::Easing,
    error::{Error, Result},
    event::Direction,
    iso::{sort_by_depth, IsoSprite},
    sprite::{EYES_OFFSET, PLAYER_FALLING, PLAYER_JUMP_FIRST, PLAYER_JUMP_LAST, TILE_CRUMBLING},
};

pub const JUMP_DURATION: f32 = 1.5;
pub const MOVE_DELAY: f32 = 0.5;
pub const MOVE_DURATION: f32 = 0.8;
pub const TILE_FALL_DELAY: f32 = 1.0;
pub const TILE_FALL_DURATION: f32 = 2.0;
pub const PLAYER_FALL_DELAY: f32 = 0.15;
pub const PLAYER_FALL_DURATION: f32 = 2.5;
pub const TRAP_STRIKE_DURATION: f32 = 0.25;
/// How far things fall, in pixels, before they are out of sight.
pub const FALL_DISTANCE: f32 = 128.0;
/// Height the trap hovers at between strikes, in pixels.
pub const TRAP_LIFT: f32 = 8.0;

/// A draw list sized for the default map plus the player, eyes and trap.
pub type DrawList = SmallVec<[IsoSprite; 32]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub map_width: usize,
    pub map_height: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 5,
            map_height: 5,
        }
    }
}

pub struct Game<R = StdRng> {
    config: GameConfig,
    player: Player,
    tiles: Vec<Tile>,
    trap: Trap,
    facing: Facing,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self> {
        let GameConfig {
            map_width,
            map_height,
        } = config;
        if map_width == 0 || map_height == 0 {
            return Err(Error::EmptyMap {
                width: map_width,
                height: map_height,
            });
        }

        let tiles = (0..map_width * map_height)
            .map(|i| Tile::new(i % map_width, i / map_width))
            .collect();
        info!(map_width, map_height, "new game");

        Ok(Self {
            config,
            player: Player::new(Vec3::ZERO),
            tiles,
            trap: Trap::new(TRAP_LIFT),
            facing: Facing::default(),
            rng,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn trap(&self) -> &Trap {
        &self.trap
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    fn tile_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.config.map_width && y < self.config.map_height)
            .then_some(y * self.config.map_width + x)
    }

    /// The tile at grid position (x, y), if it is on the map.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tile_index(x, y).map(|i| &self.tiles[i])
    }

    /// Whether the player has dropped all the way out of sight.
    pub fn player_is_gone(&self) -> bool {
        self.player.body.is_falling && !self.player.action.is_busy()
    }

    /// Advances the world by `dt` seconds. `input` is the direction pressed this
    /// frame, if any.
    pub fn update(&mut self, dt: f32, input: Option<Direction>) {
        if let Some(direction) = input {
            let body = &self.player.body;
            if !body.is_moving && !body.is_falling {
                self.start_move(Facing::from_direction(direction));
            }
        }

        self.player.update(dt);
        for tile in &mut self.tiles {
            tile.update(dt);
        }

        if !self.tiles.iter().any(|t| t.state().is_dropping()) {
            let index = self.rng.gen_range(0..self.tiles.len());
            if self.tiles[index].state() == TileState::Solid {
                self.start_tile_fall(index);
            }
        }

        if self.trap.body.is_able_to_attack {
            self.launch_trap();
        }

        self.check_footing();
        self.trap.update(dt);
    }

    fn start_move(&mut self, facing: Facing) {
        let body = &mut self.player.body;
        let start = body.sprite.pos;
        let end = start + facing.step();

        let jump = FrameAnim::new(PLAYER_JUMP_FIRST, PLAYER_JUMP_LAST, Tween::new(JUMP_DURATION));
        self.player.anim.set(jump, true);
        let walk = LinearMove::new(start, end, Tween::new(MOVE_DURATION).with_delay(MOVE_DELAY));
        self.player.action.set(PlayerMove(walk), true);

        body.is_moving = true;
        self.facing = facing;
        debug!(?facing, from = ?start, to = ?end, "player hops");
    }

    fn start_tile_fall(&mut self, index: usize) {
        let body = &mut self.tiles[index].body;
        let start = body.sprite.pos;
        body.state = TileState::Crumbling;
        body.sprite.frame = TILE_CRUMBLING;

        let tween = Tween::new(TILE_FALL_DURATION)
            .with_delay(TILE_FALL_DELAY)
            .with_easing(Easing::QuadIn);
        let fall = LinearMove::new(start, start + Vec3::Z * FALL_DISTANCE, tween);
        self.tiles[index].action.set(TileFall(fall), true);
        debug!(x = start.x, y = start.y, "tile crumbling");
    }

    fn launch_trap(&mut self) {
        let x = self.rng.gen_range(0..self.config.map_width);
        let y = self.rng.gen_range(0..self.config.map_height);
        let body = &mut self.trap.body;
        let start = Vec3::new(x as f32, y as f32, -TRAP_LIFT);
        body.sprite.pos = start;
        body.is_able_to_attack = false;
        body.is_attacking = true;

        let strike = LinearMove::new(
            start,
            start + Vec3::Z * TRAP_LIFT,
            Tween::new(TRAP_STRIKE_DURATION),
        );
        self.trap.action.set(TrapStrike(strike), true);
        debug!(x, y, "trap strikes");

        let target = Some((x as i32, y as i32));
        if !self.player.body.is_falling && self.player.sprite().grid_cell() == target {
            self.fall("hit by the trap");
        }
    }

    fn check_footing(&mut self) {
        let body = &self.player.body;
        if body.is_falling || body.is_moving {
            return;
        }
        let Some((x, y)) = body.sprite.grid_cell() else {
            return;
        };
        match self.tile_at(x, y).map(Tile::state) {
            None => self.fall("stepped off the map"),
            Some(state) if state.is_gone() => self.fall("tile fell away"),
            Some(_) => (),
        }
    }

    fn fall(&mut self, reason: &str) {
        let body = &mut self.player.body;
        body.is_moving = true;
        body.is_falling = true;
        body.sprite.order_z = 0;
        body.sprite.frame = PLAYER_FALLING;
        let start = body.sprite.pos;

        self.player.anim.stop(true);
        let tween = Tween::new(PLAYER_FALL_DURATION)
            .with_delay(PLAYER_FALL_DELAY)
            .with_easing(Easing::QuadIn);
        let drop = LinearMove::new(start, start + Vec3::Z * FALL_DISTANCE, tween);
        self.player.action.set(PlayerMove(drop), true);
        info!(pos = ?start, reason, "player falls");
    }

    /// This frame's sprites, back to front.
    pub fn sprites(&self) -> DrawList {
        let mut sprites: DrawList = self.tiles.iter().map(|t| t.body.sprite).collect();
        sprites.push(self.trap.body.sprite);

        let player = *self.player.sprite();
        sprites.push(player);

        // the eyes only show while the player faces the camera
        let flip = match self.facing {
            Facing::South => Some(false),
            Facing::West => Some(true),
            Facing::North | Facing::East => None,
        };
        if let Some(flip) = flip {
            sprites.push(IsoSprite {
                pos: player.pos,
                frame: player.frame + EYES_OFFSET,
                flip,
                order_z: player.order_z + 1,
            });
        }

        sort_by_depth(&mut sprites);
        sprites
    }

    /// A one-line summary of the trap and player, for the debug caption.
    pub fn status(&self) -> String {
        let trap = &self.trap.body;
        let player = &self.player.body;
        let strike = match self.trap.action.current() {
            Some(action) => format!("{action:?}"),
            None => "idle".to_owned(),
        };
        format!(
            "trap: able={} attacking={} {} | player: ({:.2}, {:.2}, {:.1}) moving={} falling={}",
            trap.is_able_to_attack,
            trap.is_attacking,
            strike,
            player.sprite.pos.x,
            player.sprite.pos.y,
            player.sprite.pos.z,
            player.is_moving,
            player.is_falling,
        )
    }
}
