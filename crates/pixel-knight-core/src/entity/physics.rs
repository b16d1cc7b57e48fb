//! Tile collision for moving bodies
//!
//! Movement resolves one axis at a time against the physics tiles around the
//! body. After a snap the float position is replaced by the integer rect
//! position, so sub-pixel drift is dropped on contact.

use glam::{IVec2, Vec2};

use crate::animation::{Animation, PlayerAction};
use crate::geometry::Rect;
use crate::tilemap::Tilemap;

/// Which sides touched a tile during the last step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    /// Touching a wall on either side
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub size: IVec2,
    pub velocity: Vec2,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub collisions: Collisions,
    pub last_movement: Vec2,
    /// Facing left
    pub flip: bool,
    pub action: PlayerAction,
    pub animation: Animation,
    /// Sprite offset from the collision box
    pub anim_offset: IVec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: IVec2, gravity: f32, terminal_velocity: f32) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            gravity,
            terminal_velocity,
            collisions: Collisions::default(),
            last_movement: Vec2::ZERO,
            flip: false,
            action: PlayerAction::Idle,
            animation: PlayerAction::Idle.spec().start(),
            anim_offset: IVec2::ZERO,
        }
    }

    /// Collision rect at the current (truncated) position
    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, self.size)
    }

    /// Switch animation; re-setting the current action keeps it playing
    pub fn set_action(&mut self, action: PlayerAction) {
        if action != self.action {
            log::trace!("Action {:?} -> {:?}", self.action, action);
            self.action = action;
            self.animation = action.spec().start();
        }
    }

    /// Move by `movement` plus velocity for one tick, resolving tile collisions
    pub fn step(&mut self, tilemap: &Tilemap, movement: Vec2) {
        self.collisions = Collisions::default();
        let frame_movement = movement + self.velocity;

        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_nearby(self.pos) {
            if rect.collides(&tile) {
                if frame_movement.x > 0.0 {
                    rect.set_right(tile.left());
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.set_left(tile.right());
                    self.collisions.left = true;
                }
                self.pos.x = rect.x as f32;
            }
        }

        self.pos.y += frame_movement.y;
        let mut rect = self.rect();
        for tile in tilemap.physics_rects_nearby(self.pos) {
            if rect.collides(&tile) {
                if frame_movement.y > 0.0 {
                    rect.set_bottom(tile.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.set_top(tile.bottom());
                    self.collisions.up = true;
                }
                self.pos.y = rect.y as f32;
            }
        }

        self.velocity.y = (self.velocity.y + self.gravity).min(self.terminal_velocity);
        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        self.last_movement = movement;
        self.animation.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::{Tile, TileKind};

    fn floor_map() -> Tilemap {
        let mut tilemap = Tilemap::new(16);
        for x in -4..8 {
            tilemap.set_tile(IVec2::new(x, 2), Tile::new(TileKind::Stone, 0));
        }
        tilemap.set_tile(IVec2::new(3, 1), Tile::new(TileKind::Stone, 0));
        tilemap
    }

    fn body_at(x: f32, y: f32) -> PhysicsBody {
        PhysicsBody::new(Vec2::new(x, y), IVec2::new(10, 14), 0.2, 5.0)
    }

    #[test]
    fn test_falls_onto_floor_and_stops() {
        let tilemap = floor_map();
        let mut body = body_at(0.0, 0.0);
        for _ in 0..60 {
            body.step(&tilemap, Vec2::ZERO);
        }
        assert_eq!(body.rect().bottom(), 32);
        assert!(body.velocity.y < 1.0);
    }

    #[test]
    fn test_resting_body_redetects_ground_within_airtime_buffer() {
        let tilemap = floor_map();
        let mut body = body_at(0.0, 18.0);
        for _ in 0..30 {
            body.step(&tilemap, Vec2::ZERO);
        }

        let mut since_ground = 0;
        let mut longest_gap = 0;
        for _ in 0..40 {
            body.step(&tilemap, Vec2::ZERO);
            if body.collisions.down {
                since_ground = 0;
            } else {
                since_ground += 1;
                longest_gap = longest_gap.max(since_ground);
            }
        }
        assert!(longest_gap < 4, "ground lost for {longest_gap} ticks");
    }

    #[test]
    fn test_wall_snaps_and_flags_right() {
        let tilemap = floor_map();
        let mut body = body_at(30.0, 18.0);
        for _ in 0..10 {
            body.step(&tilemap, Vec2::new(1.8, 0.0));
        }
        assert!(body.collisions.right);
        assert_eq!(body.rect().right(), 48);
        assert!(!body.flip);
    }

    #[test]
    fn test_moving_left_into_wall_flags_left() {
        let tilemap = floor_map();
        let mut body = body_at(66.0, 18.0);
        for _ in 0..10 {
            body.step(&tilemap, Vec2::new(-1.8, 0.0));
        }
        assert!(body.collisions.left);
        assert_eq!(body.rect().left(), 64);
        assert!(body.flip);
    }

    #[test]
    fn test_ceiling_bonk_zeroes_velocity() {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::new(0, 0), Tile::new(TileKind::Grass, 0));
        let mut body = body_at(2.0, 20.0);
        body.velocity.y = -5.0;
        body.step(&tilemap, Vec2::ZERO);
        assert!(body.collisions.up);
        assert_eq!(body.rect().top(), 16);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_terminal_velocity_cap() {
        let tilemap = Tilemap::new(16);
        let mut body = body_at(0.0, 0.0);
        for _ in 0..200 {
            body.step(&tilemap, Vec2::ZERO);
        }
        assert_eq!(body.velocity.y, 5.0);
    }

    #[test]
    fn test_set_action_keeps_running_animation() {
        let mut body = body_at(0.0, 0.0);
        body.set_action(PlayerAction::Run);
        body.animation.update();
        body.set_action(PlayerAction::Run);
        assert_eq!(body.animation.frame, 1);
        body.set_action(PlayerAction::Idle);
        assert_eq!(body.animation.frame, 0);
    }
}
