//! Isometric projection and draw ordering.
//!
//! World positions are in tiles along `x` and `y`, with `z` in screen pixels
//! pointing down: something with a larger `z` is drawn lower and further away.
//! `+x` runs towards the bottom right of the screen and `+y` towards the bottom left.

use glam::{Vec2, Vec3};

use crate::{error::Result, screen::Screen, sprite::Atlas};

/// The on-screen footprint the projection is built on, in pixels. A tile's top
/// face spans `width` x `height / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSize {
    pub width: f32,
    pub height: f32,
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 16.0,
        }
    }
}

/// Something placed in the world and drawn with one atlas frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoSprite {
    pub pos: Vec3,
    pub frame: usize,
    /// Mirror the frame horizontally.
    pub flip: bool,
    /// Bias added to the depth key, for sprites that share a spot.
    pub order_z: i32,
}

impl IsoSprite {
    pub fn new(pos: Vec3, frame: usize) -> Self {
        Self {
            pos,
            frame,
            flip: false,
            order_z: 0,
        }
    }

    pub fn with_order_z(mut self, order_z: i32) -> Self {
        self.order_z = order_z;
        self
    }

    /// Depth key; sprites with a larger value are drawn later, on top.
    pub fn nearness(&self) -> f32 {
        self.pos.x + self.pos.y - self.pos.z + self.order_z as f32
    }

    /// The tile this sprite occupies, if it sits exactly on one.
    pub fn grid_cell(&self) -> Option<(i32, i32)> {
        let x = self.pos.x.round();
        let y = self.pos.y.round();
        if (self.pos.x - x).abs() < f32::EPSILON && (self.pos.y - y).abs() < f32::EPSILON {
            Some((x as i32, y as i32))
        } else {
            None
        }
    }
}

/// Projects a world position to the top left corner of its frame, relative to the
/// world origin.
pub fn to_screen(pos: Vec3, tile: TileSize) -> Vec2 {
    Vec2::new(
        pos.x * tile.width / 2.0 - pos.y * tile.width / 2.0,
        pos.x * tile.height / 4.0 + pos.y * tile.height / 4.0 + pos.z,
    )
}

/// Orders sprites back to front. The sort is stable, so sprites with equal depth
/// keep the order they were pushed in.
pub fn sort_by_depth(sprites: &mut [IsoSprite]) {
    sprites.sort_by(|a, b| a.nearness().total_cmp(&b.nearness()));
}

/// Where the world origin lands on the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub tile: TileSize,
}

impl Camera {
    /// A camera that puts the middle of a `map_width` x `map_height` map in the
    /// middle of the screen. `frame` is the atlas frame size.
    pub fn centered(
        map_width: usize,
        map_height: usize,
        screen: (u16, u16),
        frame: (u16, u16),
        tile: TileSize,
    ) -> Self {
        let middle = Vec3::new(
            (map_width as f32 - 1.0) / 2.0,
            (map_height as f32 - 1.0) / 2.0,
            0.0,
        );
        let frame_center = Vec2::new(frame.0 as f32, frame.1 as f32) / 2.0;
        let screen_center = Vec2::new(screen.0 as f32, screen.1 as f32) / 2.0;
        Self {
            offset: screen_center - frame_center - to_screen(middle, tile),
            tile,
        }
    }

    /// The pixel at which to draw the top left corner of a frame at `pos`.
    pub fn world_to_screen(&self, pos: Vec3) -> (i32, i32) {
        let p = (to_screen(pos, self.tile) + self.offset).round();
        (p.x as i32, p.y as i32)
    }
}

/// Draws sprites in the given order, so later ones cover earlier ones.
pub fn draw_sprites(
    screen: &mut Screen,
    atlas: &Atlas,
    camera: &Camera,
    sprites: &[IsoSprite],
) -> Result<()> {
    for sprite in sprites {
        let frame = atlas.frame(sprite.frame)?;
        let (x, y) = camera.world_to_screen(sprite.pos);
        screen.draw_sprite(frame, x, y, sprite.flip);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::standard,
        error::Error,
        sprite::{Sprite, Texel},
    };

    #[test]
    fn projection() {
        let tile = TileSize::default();
        assert_eq!(to_screen(Vec3::ZERO, tile), Vec2::ZERO);
        assert_eq!(to_screen(Vec3::X, tile), Vec2::new(8.0, 4.0));
        assert_eq!(to_screen(Vec3::Y, tile), Vec2::new(-8.0, 4.0));
        assert_eq!(to_screen(Vec3::new(1.0, 1.0, 10.0), tile), Vec2::new(0.0, 18.0));
    }

    #[test]
    fn nearness_key() {
        let sprite = IsoSprite::new(Vec3::new(2.0, 1.0, 0.5), 0).with_order_z(1);
        assert_eq!(sprite.nearness(), 3.5);
    }

    #[test]
    fn sorting_is_stable_back_to_front() {
        let mut sprites = [
            IsoSprite::new(Vec3::new(2.0, 2.0, 0.0), 0),
            IsoSprite::new(Vec3::new(0.0, 0.0, 0.0), 1),
            IsoSprite::new(Vec3::new(1.0, 1.0, 0.0), 2),
            IsoSprite::new(Vec3::new(2.0, 0.0, 0.0), 3),
            // sunk below the floor, so behind everything
            IsoSprite::new(Vec3::new(2.0, 2.0, 64.0), 4),
        ];
        sort_by_depth(&mut sprites);
        let order: Vec<usize> = sprites.iter().map(|s| s.frame).collect();
        assert_eq!(order, vec![4, 1, 2, 3, 0]);
    }

    #[test]
    fn grid_cells() {
        assert_eq!(IsoSprite::new(Vec3::new(3.0, -1.0, 9.0), 0).grid_cell(), Some((3, -1)));
        assert_eq!(IsoSprite::new(Vec3::new(0.5, 0.0, 0.0), 0).grid_cell(), None);
    }

    #[test]
    fn camera_centers_the_map() {
        let camera = Camera::centered(5, 5, (80, 60), (16, 32), TileSize::default());
        // the middle tile's frame is centered on the screen
        assert_eq!(camera.world_to_screen(Vec3::new(2.0, 2.0, 0.0)), (32, 14));
    }

    #[test]
    fn draws_in_order() {
        let red = Sprite::from_rows(&["#"], &[('#', standard::RED)]).unwrap();
        let mut blue = Sprite::empty(1, 1);
        blue.set(0, 0, Texel::Ink(standard::BLUE));
        let atlas = Atlas::from_frames(vec![red, blue]);
        let camera = Camera {
            offset: Vec2::ZERO,
            tile: TileSize::default(),
        };
        let mut screen = Screen::new_pixels(2, 4);
        let sprites = [IsoSprite::new(Vec3::ZERO, 0), IsoSprite::new(Vec3::ZERO, 1)];
        draw_sprites(&mut screen, &atlas, &camera, &sprites).unwrap();
        assert_eq!(screen.color_at(0, 0), Some(standard::BLUE));

        let missing = [IsoSprite::new(Vec3::ZERO, 7)];
        assert!(matches!(
            draw_sprites(&mut screen, &atlas, &camera, &missing),
            Err(Error::MissingFrame { index: 7, .. })
        ));
    }
}
