//! Smooth-follow camera with look up/down.

use glam::{IVec2, Vec2};

use crate::geometry::Rect;
use crate::tuning::CameraTuning;

/// Camera scroll for the low resolution display.
///
/// Each tick the scroll moves `1 / smoothing` of the remaining distance toward
/// the player's center. Looking up or down nudges the scroll and makes the
/// follow lazier so the nudge sticks.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left of the view in world pixels
    pub scroll: Vec2,
    /// Divisor used by the next follow step
    pub smoothing: f32,
    /// Size of the view in pixels
    pub view: Vec2,
    tuning: CameraTuning,
}

impl Camera {
    /// Create a camera at the world origin.
    pub fn new(view: Vec2, tuning: CameraTuning) -> Self {
        Self {
            scroll: Vec2::ZERO,
            smoothing: tuning.smoothing,
            view,
            tuning,
        }
    }

    pub fn tuning(&self) -> &CameraTuning {
        &self.tuning
    }

    /// Reset smoothing to the base value.
    pub fn reset_smoothing(&mut self) {
        self.smoothing = self.tuning.smoothing;
    }

    /// Apply look up/down for this tick.
    ///
    /// Only takes effect once the player has idled for longer than the look
    /// threshold.
    pub fn apply_look(&mut self, looking_up: bool, looking_down: bool, idle_timer: i32) {
        if idle_timer <= self.tuning.look_threshold {
            return;
        }
        let look_smoothing = self.tuning.smoothing * self.tuning.look_smoothing_factor;
        if looking_up {
            self.scroll.y -= self.tuning.look_offset;
            self.smoothing = look_smoothing;
        }
        if looking_down {
            self.scroll.y += self.tuning.look_offset;
            self.smoothing = look_smoothing;
        }
    }

    /// Make the next follow step land exactly on the target.
    pub fn snap(&mut self) {
        self.smoothing = 1.0;
    }

    /// Move toward centering `target`.
    pub fn follow(&mut self, target: IVec2) {
        let desired = target.as_vec2() - self.view / 2.0;
        self.scroll += (desired - self.scroll) / self.smoothing.max(1.0);
    }

    /// Center on `target` immediately.
    pub fn center_on(&mut self, target: IVec2) {
        self.scroll = target.as_vec2() - self.view / 2.0;
    }

    /// Keep the view inside `bounds` when enabled in the tuning.
    ///
    /// Levels smaller than the view are centered on that axis.
    pub fn clamp_to(&mut self, bounds: Rect) {
        if !self.tuning.clamp_to_level {
            return;
        }
        self.scroll.x = clamp_axis(self.scroll.x, bounds.left(), bounds.right(), self.view.x);
        self.scroll.y = clamp_axis(self.scroll.y, bounds.top(), bounds.bottom(), self.view.y);
    }

    /// Integer scroll used for drawing.
    pub fn render_scroll(&self) -> IVec2 {
        IVec2::new(self.scroll.x as i32, self.scroll.y as i32)
    }
}

fn clamp_axis(scroll: f32, min: i32, max: i32, view: f32) -> f32 {
    let (min, max) = (min as f32, max as f32);
    if max - min <= view {
        return min + (max - min - view) / 2.0;
    }
    scroll.clamp(min, max - view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec2::new(320.0, 240.0), CameraTuning::default())
    }

    #[test]
    fn test_follow_moves_a_tenth_of_the_distance() {
        let mut camera = camera();
        camera.follow(IVec2::new(260, 220));
        // desired scroll is (100, 100)
        assert_eq!(camera.scroll, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_snap_lands_on_target() {
        let mut camera = camera();
        camera.snap();
        camera.follow(IVec2::new(160, 120));
        assert_eq!(camera.scroll, Vec2::ZERO);
        camera.snap();
        camera.follow(IVec2::new(1160, 120));
        assert_eq!(camera.render_scroll(), IVec2::new(1000, 0));
    }

    #[test]
    fn test_look_needs_idle_threshold() {
        let mut camera = camera();
        camera.apply_look(true, false, 30);
        assert_eq!(camera.scroll.y, 0.0);
        assert_eq!(camera.smoothing, 10.0);

        camera.apply_look(true, false, 31);
        assert_eq!(camera.scroll.y, -4.5);
        assert_eq!(camera.smoothing, 17.5);

        camera.reset_smoothing();
        camera.apply_look(false, true, 31);
        assert_eq!(camera.scroll.y, 0.0);
    }

    #[test]
    fn test_render_scroll_truncates() {
        let mut camera = camera();
        camera.scroll = Vec2::new(10.9, -3.7);
        assert_eq!(camera.render_scroll(), IVec2::new(10, -3));
    }

    #[test]
    fn test_clamp_only_when_enabled() {
        let bounds = Rect::new(0, 0, 1000, 500);
        let mut camera = camera();
        camera.scroll = Vec2::new(-50.0, 400.0);
        camera.clamp_to(bounds);
        assert_eq!(camera.scroll, Vec2::new(-50.0, 400.0));

        let tuning = CameraTuning {
            clamp_to_level: true,
            ..Default::default()
        };
        let mut camera = Camera::new(Vec2::new(320.0, 240.0), tuning);
        camera.scroll = Vec2::new(-50.0, 400.0);
        camera.clamp_to(bounds);
        assert_eq!(camera.scroll, Vec2::new(0.0, 260.0));

        // Narrower than the view: centered
        camera.clamp_to(Rect::new(0, 0, 200, 500));
        assert_eq!(camera.scroll.x, -60.0);
    }
}
