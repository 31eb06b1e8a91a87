//! The demo's frames, drawn in code so the binary needs no image files.
//!
//! Every frame is [`FRAME_WIDTH`] x [`FRAME_HEIGHT`] pixels. A tile's top face is a
//! 16x8 diamond centered on (8, 20), so a sprite standing on a tile has its feet
//! around row 20 and the rows above for its body.

use super::{Atlas, Sprite, Texel};
use crate::color::{standard, Color};

pub const FRAME_WIDTH: u16 = 16;
pub const FRAME_HEIGHT: u16 = 32;

pub const TILE_CRUMBLING: usize = 0;
pub const TILE_SOLID: usize = 1;
pub const PLAYER_JUMP_FIRST: usize = 2;
pub const PLAYER_JUMP_LAST: usize = 10;
/// The jump's peak pose, reused while falling.
pub const PLAYER_FALLING: usize = 5;
/// Eye overlays sit this many frames after the body frame they belong to.
pub const EYES_OFFSET: usize = 9;
pub const TRAP: usize = 20;
/// Frames the game draws from; a custom atlas needs at least this many.
pub const FRAME_COUNT: usize = TRAP + 1;

const FACE_TOP: u16 = 16;
const FACE_ROWS: u16 = 8;
const SIDE_DEPTH: u16 = 4;
const FEET_ROW: i32 = 20;

/// Pixels the body rises on each jump frame.
const JUMP_LIFT: [i32; PLAYER_JUMP_LAST - PLAYER_JUMP_FIRST + 1] = [0, 3, 5, 7, 6, 5, 3, 1, 0];

const PLAYER_ROWS: [&str; 9] = [
    "..####..",
    ".#----#.",
    "#------#",
    "#------#",
    "#------#",
    "#------#",
    ".#----#.",
    "..#..#..",
    "..#..#..",
];

const EYE_ROWS: [&str; 2] = ["....e.e.", "....e.e."];

const TRAP_ROWS: [&str; 6] = [
    "##########",
    "#--------#",
    "##########",
    ".x.x..x.x.",
    ".x.x..x.x.",
    "..x....x..",
];

struct Palette {
    face: Color,
    edge: Color,
    left: Color,
    right: Color,
}

const SOLID: Palette = Palette {
    face: standard::GREEN,
    edge: standard::BRIGHT_GREEN,
    left: standard::YELLOW,
    right: standard::BRIGHT_BLACK,
};

const CRUMBLING: Palette = Palette {
    face: standard::YELLOW,
    edge: standard::BRIGHT_YELLOW,
    left: standard::YELLOW,
    right: standard::BRIGHT_BLACK,
};

/// Half the width of the top face on the given frame row, or 0 off the face.
fn face_half_width(row: u16) -> u16 {
    if !(FACE_TOP..FACE_TOP + FACE_ROWS).contains(&row) {
        return 0;
    }
    let mid = FACE_TOP + FACE_ROWS / 2;
    let dy = if row < mid { mid - 1 - row } else { row - mid };
    FRAME_WIDTH / 2 - 2 * dy
}

fn tile(palette: &Palette, cracked: bool) -> Sprite {
    let mut sprite = Sprite::empty(FRAME_WIDTH, FRAME_HEIGHT);
    let center = FRAME_WIDTH / 2;

    for row in FACE_TOP..FACE_TOP + FACE_ROWS {
        let half = face_half_width(row);
        for x in center - half..center + half {
            let edge = x < center - half + 2 || x >= center + half - 2;
            let texel = if edge {
                Texel::Ink(palette.edge)
            } else if cracked {
                // two diagonal cracks across the face
                if (x + row) % 5 == 0 || x.abs_diff(row) == 1 {
                    Texel::Ink(palette.face)
                } else {
                    Texel::Mask
                }
            } else if (x + row) % 3 != 0 {
                Texel::Ink(palette.face)
            } else {
                Texel::Mask
            };
            sprite.set(x, row, texel);
        }
    }

    // side faces hang below the lower edges of the diamond
    let mid = FACE_TOP + FACE_ROWS / 2;
    for x in 0..FRAME_WIDTH {
        let from_center = if x < center { x } else { FRAME_WIDTH - 1 - x };
        let bottom = mid + from_center / 2;
        let color = if x < center { palette.left } else { palette.right };
        for row in bottom + 1..=bottom + SIDE_DEPTH {
            let texel = if (x + row) % 2 == 0 {
                Texel::Ink(color)
            } else {
                Texel::Mask
            };
            sprite.set(x, row, texel);
        }
    }
    sprite
}

fn body_frame(art: &Sprite, lift: i32) -> Sprite {
    let mut sprite = Sprite::empty(FRAME_WIDTH, FRAME_HEIGHT);
    let x = (FRAME_WIDTH - art.width()) as i32 / 2;
    let y = FEET_ROW - art.height() as i32 - lift;
    sprite.stamp(art, x, y);
    sprite
}

fn eyes_frame(eyes: &Sprite, body_height: u16, lift: i32) -> Sprite {
    let mut sprite = Sprite::empty(FRAME_WIDTH, FRAME_HEIGHT);
    let x = (FRAME_WIDTH - eyes.width()) as i32 / 2;
    let y = FEET_ROW - body_height as i32 - lift + 2;
    sprite.stamp(eyes, x, y);
    sprite
}

impl Atlas {
    /// Generates every frame the demo uses, at the indices given by the constants
    /// in this module.
    pub fn builtin() -> Self {
        // the art tables above are all rectangular and only use palette keys
        let player = Sprite::from_rows(&PLAYER_ROWS, &[('#', standard::BRIGHT_WHITE)])
            .unwrap_or_else(|| Sprite::empty(0, 0));
        let eyes = Sprite::from_rows(&EYE_ROWS, &[('e', standard::BRIGHT_CYAN)])
            .unwrap_or_else(|| Sprite::empty(0, 0));
        let trap = Sprite::from_rows(
            &TRAP_ROWS,
            &[('#', standard::RED), ('x', standard::BRIGHT_RED)],
        )
        .unwrap_or_else(|| Sprite::empty(0, 0));

        let mut frames = Vec::with_capacity(FRAME_COUNT);
        frames.push(tile(&CRUMBLING, true));
        frames.push(tile(&SOLID, false));
        frames.extend(JUMP_LIFT.iter().map(|&lift| body_frame(&player, lift)));
        frames.extend(
            JUMP_LIFT
                .iter()
                .map(|&lift| eyes_frame(&eyes, player.height(), lift)),
        );
        frames.push(body_frame(&trap, -2));

        Atlas::from_frames(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_indices() {
        let atlas = Atlas::builtin();
        assert_eq!(atlas.len(), FRAME_COUNT);
        assert_eq!(atlas.frame_size(), (FRAME_WIDTH, FRAME_HEIGHT));
        assert_eq!(PLAYER_JUMP_LAST + EYES_OFFSET, TRAP - 1);
        assert!((PLAYER_JUMP_FIRST..=PLAYER_JUMP_LAST).contains(&PLAYER_FALLING));
    }

    #[test]
    fn face_is_a_diamond() {
        assert_eq!(face_half_width(FACE_TOP - 1), 0);
        assert_eq!(face_half_width(FACE_TOP), 2);
        assert_eq!(face_half_width(19), 8);
        assert_eq!(face_half_width(20), 8);
        assert_eq!(face_half_width(FACE_TOP + FACE_ROWS - 1), 2);
        assert_eq!(face_half_width(FACE_TOP + FACE_ROWS), 0);
    }

    #[test]
    fn tile_center_is_opaque() {
        let atlas = Atlas::builtin();
        for index in [TILE_CRUMBLING, TILE_SOLID] {
            let tile = atlas.frame(index).unwrap();
            assert!(tile.texel(8, 20).is_opaque());
            assert!(!tile.texel(0, 0).is_opaque());
        }
    }

    #[test]
    fn jump_peaks_in_the_middle() {
        let atlas = Atlas::builtin();
        let top_row = |index: usize| {
            let frame = atlas.frame(index).unwrap();
            (0..FRAME_HEIGHT)
                .find(|&y| (0..FRAME_WIDTH).any(|x| frame.texel(x, y).is_opaque()))
                .unwrap()
        };
        assert!(top_row(PLAYER_FALLING) < top_row(PLAYER_JUMP_FIRST));
        assert_eq!(top_row(PLAYER_JUMP_FIRST), top_row(PLAYER_JUMP_LAST));
    }
}
