//! The things living on the map. Each entity is split into a body, which actions
//! mutate, and the tracks holding those actions.

use glam::Vec3;

use crate::{
    action::{Placed, Track},
    event::Direction,
    iso::IsoSprite,
    sprite::{PLAYER_JUMP_FIRST, TILE_SOLID, TRAP},
};

/// Which way the player last moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    /// Towards `+x`, down and to the right on screen.
    #[default]
    South,
    /// Towards `+y`, down and to the left.
    West,
    North,
    East,
}

impl Facing {
    /// Arrow keys follow the screen: down is south, left is west.
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Down => Facing::South,
            Direction::Left => Facing::West,
            Direction::Up => Facing::North,
            Direction::Right => Facing::East,
        }
    }

    /// One tile's step in this direction.
    pub fn step(self) -> Vec3 {
        match self {
            Facing::South => Vec3::X,
            Facing::West => Vec3::Y,
            Facing::North => Vec3::NEG_X,
            Facing::East => Vec3::NEG_Y,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBody {
    pub sprite: IsoSprite,
    pub is_moving: bool,
    pub is_falling: bool,
}

impl Placed for PlayerBody {
    fn sprite(&self) -> &IsoSprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut IsoSprite {
        &mut self.sprite
    }
}

#[derive(Debug)]
pub struct Player {
    pub body: PlayerBody,
    /// Movement.
    pub action: Track<PlayerBody>,
    /// Frame animation, running alongside movement.
    pub anim: Track<PlayerBody>,
}

impl Player {
    pub fn new(pos: Vec3) -> Self {
        Self {
            body: PlayerBody {
                sprite: IsoSprite::new(pos, PLAYER_JUMP_FIRST).with_order_z(1),
                is_moving: false,
                is_falling: false,
            },
            action: Track::new(),
            anim: Track::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.action.update(&mut self.body, dt);
        self.anim.update(&mut self.body, dt);
    }

    pub fn sprite(&self) -> &IsoSprite {
        &self.body.sprite
    }
}

/// Life cycle of a floor tile. Tiles only ever move forward through it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileState {
    #[default]
    Solid,
    /// Marked to fall, but still holding up whoever stands on it.
    Crumbling,
    Falling,
    Fallen,
}

impl TileState {
    /// Whether a tile in this state has started to drop away.
    pub fn is_gone(self) -> bool {
        matches!(self, TileState::Falling | TileState::Fallen)
    }

    /// Whether the tile is on its way down.
    pub fn is_dropping(self) -> bool {
        matches!(self, TileState::Crumbling | TileState::Falling)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileBody {
    pub sprite: IsoSprite,
    pub state: TileState,
}

impl Placed for TileBody {
    fn sprite(&self) -> &IsoSprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut IsoSprite {
        &mut self.sprite
    }
}

#[derive(Debug)]
pub struct Tile {
    pub body: TileBody,
    pub action: Track<TileBody>,
}

impl Tile {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            body: TileBody {
                sprite: IsoSprite::new(Vec3::new(x as f32, y as f32, 0.0), TILE_SOLID),
                state: TileState::Solid,
            },
            action: Track::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.action.update(&mut self.body, dt);
    }

    pub fn state(&self) -> TileState {
        self.body.state
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrapBody {
    pub sprite: IsoSprite,
    pub is_attacking: bool,
    pub is_able_to_attack: bool,
}

impl Placed for TrapBody {
    fn sprite(&self) -> &IsoSprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut IsoSprite {
        &mut self.sprite
    }
}

#[derive(Debug)]
pub struct Trap {
    pub body: TrapBody,
    pub action: Track<TrapBody>,
}

impl Trap {
    /// A trap ready to strike, hovering `lift` pixels over the origin.
    pub fn new(lift: f32) -> Self {
        Self {
            body: TrapBody {
                sprite: IsoSprite::new(Vec3::new(0.0, 0.0, -lift), TRAP),
                is_attacking: false,
                is_able_to_attack: true,
            },
            action: Track::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.action.update(&mut self.body, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_iso_directions() {
        assert_eq!(Facing::from_direction(Direction::Down), Facing::South);
        assert_eq!(Facing::from_direction(Direction::Left), Facing::West);
        assert_eq!(Facing::South.step(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(Facing::East.step(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn tile_states() {
        assert!(!TileState::Solid.is_gone());
        assert!(!TileState::Crumbling.is_gone());
        assert!(TileState::Crumbling.is_dropping());
        assert!(TileState::Fallen.is_gone());
        assert!(!TileState::Fallen.is_dropping());
    }

    #[test]
    fn new_entities() {
        let player = Player::new(Vec3::ZERO);
        assert_eq!(player.sprite().order_z, 1);
        assert!(player.action.is_idle() && player.anim.is_idle());

        let tile = Tile::new(3, 2);
        assert_eq!(tile.body.sprite.pos, Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(tile.state(), TileState::Solid);

        let trap = Trap::new(8.0);
        assert_eq!(trap.body.sprite.pos.z, -8.0);
        assert!(trap.body.is_able_to_attack);
    }
}
