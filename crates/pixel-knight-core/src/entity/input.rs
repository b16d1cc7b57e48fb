//! Player input for one simulation tick

/// Held directions plus the button edges that happened since the last tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInput {
    // Held state
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,

    // Edges, consumed by one tick
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_pressed: bool,
    pub grub_finder_pressed: bool,
    pub dev_unlock_pressed: bool,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal direction: -1, 0 or 1 (both held cancel out)
    pub fn movement_x(&self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }

    /// Drop the edge flags after a tick has seen them
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.dash_pressed = false;
        self.grub_finder_pressed = false;
        self.dev_unlock_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_new() {
        let input = PlayerInput::new();
        assert!(!input.left && !input.right && !input.up && !input.down);
        assert!(!input.jump_pressed);
        assert_eq!(input.movement_x(), 0.0);
    }

    #[test]
    fn test_movement_x() {
        let mut input = PlayerInput::new();
        input.left = true;
        assert_eq!(input.movement_x(), -1.0);
        input.right = true;
        assert_eq!(input.movement_x(), 0.0);
        input.left = false;
        assert_eq!(input.movement_x(), 1.0);
    }

    #[test]
    fn test_clear_edges_keeps_held_state() {
        let mut input = PlayerInput {
            right: true,
            jump_pressed: true,
            dash_pressed: true,
            ..Default::default()
        };
        input.clear_edges();
        assert!(input.right);
        assert!(!input.jump_pressed);
        assert!(!input.dash_pressed);
    }
}
