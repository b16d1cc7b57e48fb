//! Integer rectangles used for collision and hit tests

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle
///
/// Float positions are truncated toward zero when a rect is built from them,
/// so a body sitting on a tile only re-detects the floor once its fractional
/// fall accumulates a whole pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect at a float position (truncated toward zero)
    pub fn from_pos(pos: Vec2, size: IVec2) -> Self {
        Self::new(pos.x as i32, pos.y as i32, size.x, size.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.center_y())
    }

    pub fn mid_bottom(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.bottom())
    }

    pub fn mid_top(&self) -> IVec2 {
        IVec2::new(self.center_x(), self.top())
    }

    pub fn mid_left(&self) -> IVec2 {
        IVec2::new(self.left(), self.center_y())
    }

    pub fn mid_right(&self) -> IVec2 {
        IVec2::new(self.right(), self.center_y())
    }

    pub fn bottom_left(&self) -> IVec2 {
        IVec2::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> IVec2 {
        IVec2::new(self.right(), self.bottom())
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap test: rects that only share an edge do not collide
    pub fn collides(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Point containment (right and bottom edges exclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Convert an integer point to float space
pub fn to_vec2(point: IVec2) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pos_truncates_toward_zero() {
        let rect = Rect::from_pos(Vec2::new(3.9, -0.5), IVec2::new(10, 14));
        assert_eq!(rect.x, 3);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0, 0, 16, 16);
        let b = Rect::new(16, 0, 16, 16);
        assert!(!a.collides(&b));

        let c = Rect::new(15, 0, 16, 16);
        assert!(a.collides(&c));
    }

    #[test]
    fn test_edge_setters() {
        let mut rect = Rect::new(0, 0, 10, 14);
        rect.set_right(32);
        assert_eq!(rect.x, 22);
        rect.set_bottom(48);
        assert_eq!(rect.y, 34);
        assert_eq!(rect.mid_bottom(), IVec2::new(27, 48));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0, 0, 16, 16);
        let b = Rect::new(32, -16, 16, 16);
        assert_eq!(a.union(&b), Rect::new(0, -16, 48, 32));
    }

    #[test]
    fn test_contains_point() {
        let rect = Rect::new(0, 0, 16, 16);
        assert!(rect.contains_point(Vec2::new(0.0, 15.9)));
        assert!(!rect.contains_point(Vec2::new(16.0, 4.0)));
    }
}
