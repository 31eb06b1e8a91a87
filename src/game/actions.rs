//! Moves with side effects on the entity that owns them.

use tracing::debug;

use super::entity::{PlayerBody, TileBody, TileState, TrapBody};
use crate::action::{Action, LinearMove, Tween};

/// Seconds the trap takes to rise back after striking.
pub const TRAP_RETRACT_DURATION: f32 = 1.5;

/// Walks or drops the player; clears `is_moving` when done.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerMove(pub LinearMove);

impl Action<PlayerBody> for PlayerMove {
    fn step(&mut self, body: &mut PlayerBody, dt: f32) {
        self.0.advance(&mut body.sprite.pos, dt);
    }

    fn is_finished(&self) -> bool {
        self.0.tween.is_finished()
    }

    fn is_acting(&self) -> bool {
        self.0.tween.is_acting()
    }

    fn finish(&mut self, body: &mut PlayerBody) -> Option<Box<dyn Action<PlayerBody>>> {
        body.is_moving = false;
        None
    }
}

/// Drops a tile out of the floor, keeping its [`TileState`] in step.
#[derive(Clone, Debug, PartialEq)]
pub struct TileFall(pub LinearMove);

impl Action<TileBody> for TileFall {
    fn step(&mut self, body: &mut TileBody, dt: f32) {
        self.0.advance(&mut body.sprite.pos, dt);
        body.state = if self.0.tween.is_acting() {
            TileState::Falling
        } else {
            TileState::Crumbling
        };
    }

    fn is_finished(&self) -> bool {
        self.0.tween.is_finished()
    }

    fn is_acting(&self) -> bool {
        self.0.tween.is_acting()
    }

    fn finish(&mut self, body: &mut TileBody) -> Option<Box<dyn Action<TileBody>>> {
        body.state = TileState::Fallen;
        debug!(pos = ?body.sprite.pos, "tile gone");
        None
    }
}

/// The trap's downward strike. Hands over to a [`TrapRetract`] along the same path.
#[derive(Clone, Debug, PartialEq)]
pub struct TrapStrike(pub LinearMove);

impl Action<TrapBody> for TrapStrike {
    fn step(&mut self, body: &mut TrapBody, dt: f32) {
        self.0.advance(&mut body.sprite.pos, dt);
    }

    fn is_finished(&self) -> bool {
        self.0.tween.is_finished()
    }

    fn finish(&mut self, body: &mut TrapBody) -> Option<Box<dyn Action<TrapBody>>> {
        body.is_attacking = false;
        body.is_able_to_attack = false;
        let back = LinearMove::new(self.0.end, self.0.start, Tween::new(TRAP_RETRACT_DURATION));
        Some(Box::new(TrapRetract(back)))
    }
}

/// Lifts the trap back up; it may strike again once this finishes.
#[derive(Clone, Debug, PartialEq)]
pub struct TrapRetract(pub LinearMove);

impl Action<TrapBody> for TrapRetract {
    fn step(&mut self, body: &mut TrapBody, dt: f32) {
        self.0.advance(&mut body.sprite.pos, dt);
    }

    fn is_finished(&self) -> bool {
        self.0.tween.is_finished()
    }

    fn finish(&mut self, body: &mut TrapBody) -> Option<Box<dyn Action<TrapBody>>> {
        body.is_able_to_attack = true;
        None
    }
}
