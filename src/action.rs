//! Actions: small timed behaviours that drive a sprite's position or frame.
//!
//! An [`Action`] is stepped once per frame until it reports itself finished, at
//! which point its [`Action::finish`] hook runs exactly once. Each entity owns one
//! [`Track`] per concurrent action (for example one for movement and one for its
//! animation). The timing of every built-in action is a [`Tween`]: nothing happens
//! for `delay` seconds, then progress runs from 0 to 1 over `duration` seconds.

use std::fmt;

use glam::Vec3;
use tracing::trace;

use crate::{easing::Easing, iso::IsoSprite};

/// A delay + duration window with an easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub delay: f32,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
    done: bool,
}

impl Tween {
    pub fn new(duration: f32) -> Self {
        Self {
            delay: 0.0,
            duration: duration.max(0.0),
            easing: Easing::Linear,
            elapsed: 0.0,
            done: false,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Seconds since the tween was created, including the delay.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Progress in `[0, 1]` before easing.
    pub fn linear_progress(&self) -> f32 {
        let active = (self.elapsed - self.delay).max(0.0);
        if self.duration > 0.0 {
            (active / self.duration).min(1.0)
        } else if self.elapsed >= self.delay {
            1.0
        } else {
            0.0
        }
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.easing.apply(self.linear_progress())
    }

    /// Advances time by `dt` and returns the new eased progress, or `None` if the
    /// tween had already finished.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.done {
            return None;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed - self.delay >= self.duration {
            self.done = true;
        }
        Some(self.progress())
    }

    /// Whether the delay is over.
    pub fn is_acting(&self) -> bool {
        self.elapsed >= self.delay
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }
}

/// A timed behaviour applied to an entity of type `E`.
pub trait Action<E>: fmt::Debug {
    /// Advances the action by `dt` seconds and applies it to `entity`.
    fn step(&mut self, entity: &mut E, dt: f32);

    fn is_finished(&self) -> bool;

    /// Whether the action has started to take effect (its delay, if any, is over).
    fn is_acting(&self) -> bool {
        true
    }

    /// Called once, on the step where the action finishes. A returned action takes
    /// this one's place in its [`Track`].
    fn finish(&mut self, _entity: &mut E) -> Option<Box<dyn Action<E>>> {
        None
    }
}

/// Entities that have an [`IsoSprite`] for actions to move and animate.
pub trait Placed {
    fn sprite(&self) -> &IsoSprite;
    fn sprite_mut(&mut self) -> &mut IsoSprite;
}

impl Placed for IsoSprite {
    fn sprite(&self) -> &IsoSprite {
        self
    }

    fn sprite_mut(&mut self) -> &mut IsoSprite {
        self
    }
}

/// Moves a position from `start` to `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearMove {
    pub start: Vec3,
    pub end: Vec3,
    pub tween: Tween,
}

impl LinearMove {
    pub fn new(start: Vec3, end: Vec3, tween: Tween) -> Self {
        Self { start, end, tween }
    }

    /// Advances the tween and writes the interpolated position to `pos`.
    pub fn advance(&mut self, pos: &mut Vec3, dt: f32) {
        if let Some(t) = self.tween.advance(dt) {
            *pos = self.start.lerp(self.end, t);
        }
    }
}

impl<E: Placed> Action<E> for LinearMove {
    fn step(&mut self, entity: &mut E, dt: f32) {
        self.advance(&mut entity.sprite_mut().pos, dt);
    }

    fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }

    fn is_acting(&self) -> bool {
        self.tween.is_acting()
    }
}

/// Plays atlas frames `first..=last`; `last` shows once the animation completes.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAnim {
    pub first: usize,
    pub last: usize,
    pub tween: Tween,
}

impl FrameAnim {
    pub fn new(first: usize, last: usize, tween: Tween) -> Self {
        Self { first, last, tween }
    }

    /// The frame shown at the tween's current progress.
    pub fn frame(&self) -> usize {
        let span = self.last as f32 - self.first as f32;
        let frame = self.first as i64 + (span * self.tween.linear_progress()) as i64;
        frame.max(0) as usize
    }

    /// Advances the tween and writes the current frame to `frame`.
    pub fn advance(&mut self, frame: &mut usize, dt: f32) {
        if self.tween.advance(dt).is_some() {
            *frame = self.frame();
        }
    }
}

impl<E: Placed> Action<E> for FrameAnim {
    fn step(&mut self, entity: &mut E, dt: f32) {
        self.advance(&mut entity.sprite_mut().frame, dt);
    }

    fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }

    fn is_acting(&self) -> bool {
        self.tween.is_acting()
    }
}

/// A slot holding at most one action for an entity of type `E`.
pub struct Track<E> {
    current: Option<Box<dyn Action<E>>>,
}

impl<E> Default for Track<E> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<E> fmt::Debug for Track<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current {
            Some(action) => write!(f, "Track({action:?})"),
            None => f.write_str("Track(idle)"),
        }
    }
}

impl<E> Track<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `action`. Unless `forced`, an action that is still running is kept
    /// and `action` is dropped. Returns whether `action` was installed.
    pub fn set<A: Action<E> + 'static>(&mut self, action: A, forced: bool) -> bool {
        self.set_boxed(Box::new(action), forced)
    }

    pub fn set_boxed(&mut self, action: Box<dyn Action<E>>, forced: bool) -> bool {
        if forced || !self.is_busy() {
            self.current = Some(action);
            true
        } else {
            trace!(?action, "track busy, action dropped");
            false
        }
    }

    /// Removes the current action. Unless `forced`, a running action is kept.
    /// Returns whether an action was removed.
    pub fn stop(&mut self, forced: bool) -> bool {
        match &self.current {
            Some(action) if forced || action.is_finished() => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Steps the current action, running its finish hook if this step completed it.
    /// Finished actions stay in the track, inert, until replaced or stopped.
    pub fn update(&mut self, entity: &mut E, dt: f32) {
        let Some(action) = self.current.as_mut() else {
            return;
        };
        if action.is_finished() {
            return;
        }
        action.step(entity, dt);
        if action.is_finished() {
            if let Some(next) = action.finish(entity) {
                self.current = Some(next);
            }
        }
    }

    /// Whether the track holds no action at all, finished or not.
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Whether the track holds an action that has not finished.
    pub fn is_busy(&self) -> bool {
        self.current.as_ref().is_some_and(|a| !a.is_finished())
    }

    /// Whether the track holds an action whose delay is over.
    pub fn is_acting(&self) -> bool {
        self.current.as_ref().is_some_and(|a| a.is_acting())
    }

    pub fn current(&self) -> Option<&dyn Action<E>> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.125;

    fn sprite() -> IsoSprite {
        IsoSprite::new(Vec3::ZERO, 0)
    }

    /// Counts finish calls on the entity's order_z and optionally chains a move.
    #[derive(Debug)]
    struct Counted {
        tween: Tween,
        chain: Option<Vec3>,
    }

    impl Action<IsoSprite> for Counted {
        fn step(&mut self, _entity: &mut IsoSprite, dt: f32) {
            self.tween.advance(dt);
        }

        fn is_finished(&self) -> bool {
            self.tween.is_finished()
        }

        fn finish(&mut self, entity: &mut IsoSprite) -> Option<Box<dyn Action<IsoSprite>>> {
            entity.order_z += 1;
            self.chain.map(|end| {
                Box::new(LinearMove::new(entity.pos, end, Tween::new(0.5)))
                    as Box<dyn Action<IsoSprite>>
            })
        }
    }

    #[test]
    fn tween_window() {
        let mut tween = Tween::new(1.0).with_delay(0.5);
        assert_eq!(tween.advance(0.25), Some(0.0));
        assert!(!tween.is_acting());
        assert_eq!(tween.advance(0.25), Some(0.0));
        assert!(tween.is_acting());
        assert_eq!(tween.advance(0.5), Some(0.5));
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(0.5), Some(1.0));
        assert!(tween.is_finished());
        assert_eq!(tween.advance(0.5), None);
        assert_eq!(tween.elapsed(), 1.5);
    }

    #[test]
    fn tween_overshoot_clamps() {
        let mut tween = Tween::new(1.0).with_easing(Easing::QuadIn);
        assert_eq!(tween.advance(0.5), Some(0.25));
        assert_eq!(tween.advance(10.0), Some(1.0));
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_finishes_on_first_step() {
        let mut tween = Tween::new(0.0);
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(0.0), Some(1.0));
        assert!(tween.is_finished());
    }

    #[test]
    fn linear_move_interpolates() {
        let mut entity = sprite();
        let mut track = Track::new();
        let end = Vec3::new(1.0, 0.0, 8.0);
        assert!(track.set(LinearMove::new(Vec3::ZERO, end, Tween::new(0.5)), false));

        track.update(&mut entity, DT);
        assert_eq!(entity.pos, Vec3::new(0.25, 0.0, 2.0));
        for _ in 0..10 {
            track.update(&mut entity, DT);
        }
        assert_eq!(entity.pos, end);
        assert!(!track.is_busy());
        assert!(!track.is_idle());
    }

    #[test]
    fn frame_anim_walks_frames() {
        let mut entity = sprite();
        let mut anim = FrameAnim::new(2, 10, Tween::new(1.0));
        assert_eq!(anim.frame(), 2);
        let mut seen = vec![];
        while !Action::<IsoSprite>::is_finished(&anim) {
            anim.step(&mut entity, DT);
            seen.push(entity.frame);
        }
        assert_eq!(seen, vec![3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn finish_runs_exactly_once() {
        let mut entity = sprite();
        let mut track = Track::new();
        track.set(
            Counted {
                tween: Tween::new(0.25),
                chain: None,
            },
            true,
        );
        for _ in 0..8 {
            track.update(&mut entity, DT);
        }
        assert_eq!(entity.order_z, 1);
    }

    #[test]
    fn finish_can_chain_the_next_action() {
        let mut entity = sprite();
        let mut track = Track::new();
        track.set(
            Counted {
                tween: Tween::new(DT),
                chain: Some(Vec3::new(0.0, 2.0, 0.0)),
            },
            true,
        );
        track.update(&mut entity, DT);
        assert_eq!(entity.order_z, 1);
        assert!(track.is_busy(), "chained move took over");

        for _ in 0..4 {
            track.update(&mut entity, DT);
        }
        assert_eq!(entity.pos, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(entity.order_z, 1);
    }

    #[test]
    fn set_respects_running_actions() {
        let mut track: Track<IsoSprite> = Track::new();
        let short = || LinearMove::new(Vec3::ZERO, Vec3::X, Tween::new(DT));

        assert!(track.set(short(), false), "empty track accepts");
        assert!(!track.set(short(), false), "running action is kept");
        assert!(track.set(short(), true), "forced replaces");

        let mut entity = sprite();
        track.update(&mut entity, DT);
        assert!(track.set(short(), false), "finished action is replaced");
    }

    #[test]
    fn stop_respects_running_actions() {
        let mut track: Track<IsoSprite> = Track::new();
        assert!(!track.stop(true), "nothing to stop");

        track.set(LinearMove::new(Vec3::ZERO, Vec3::X, Tween::new(1.0)), true);
        assert!(!track.stop(false));
        assert!(track.stop(true));
        assert!(track.is_idle());

        track.set(LinearMove::new(Vec3::ZERO, Vec3::X, Tween::new(0.0)), true);
        track.update(&mut sprite(), DT);
        assert!(track.stop(false));
    }

    #[test]
    fn acting_follows_the_delay() {
        let mut entity = sprite();
        let mut track = Track::new();
        let delayed = Tween::new(1.0).with_delay(0.5);
        track.set(LinearMove::new(Vec3::ZERO, Vec3::Z, delayed), true);
        track.update(&mut entity, 0.25);
        assert!(!track.is_acting());
        assert_eq!(entity.pos, Vec3::ZERO);
        track.update(&mut entity, 0.25);
        assert!(track.is_acting());
    }
}
