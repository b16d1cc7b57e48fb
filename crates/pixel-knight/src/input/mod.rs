//! Input handling
//!
//! Keyboard and gamepad report held actions per source. The mapper merges
//! them, turns transitions into press and release edges, and keeps edges
//! latched until a simulation tick consumes them. Frames can run faster or
//! slower than ticks, so a tap between two ticks is never lost.

pub mod actions;
pub mod gamepad;
pub mod keyboard;

use std::collections::HashSet;

use pixel_knight_core::entity::PlayerInput;

pub use actions::Action;
pub use gamepad::Gamepad;

/// Device an action is held on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Gamepad,
}

#[derive(Debug, Default)]
pub struct InputMapper {
    held: HashSet<(InputSource, Action)>,
    pressed: HashSet<Action>,
    released: HashSet<Action>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held on any source
    pub fn is_held(&self, action: Action) -> bool {
        self.held.iter().any(|(_, held)| *held == action)
    }

    pub fn set_held(&mut self, source: InputSource, action: Action, held: bool) {
        let was_held = self.is_held(action);
        if held {
            self.held.insert((source, action));
        } else {
            self.held.remove(&(source, action));
        }

        match (was_held, self.is_held(action)) {
            (false, true) => {
                self.pressed.insert(action);
            }
            (true, false) => {
                self.released.insert(action);
            }
            _ => {}
        }
    }

    pub fn press(&mut self, source: InputSource, action: Action) {
        self.set_held(source, action, true);
    }

    pub fn release(&mut self, source: InputSource, action: Action) {
        self.set_held(source, action, false);
    }

    /// Release everything a source holds (focus lost, pad unplugged)
    pub fn release_all(&mut self, source: InputSource) {
        let actions: Vec<Action> = self
            .held
            .iter()
            .filter(|(held_source, _)| *held_source == source)
            .map(|(_, action)| *action)
            .collect();
        for action in actions {
            self.release(source, action);
        }
    }

    /// Consume a latched press of a non-gameplay action
    pub fn take_pressed(&mut self, action: Action) -> bool {
        self.pressed.remove(&action)
    }

    /// Snapshot for the next simulation tick
    pub fn player_input(&self) -> PlayerInput {
        PlayerInput {
            left: self.is_held(Action::MoveLeft),
            right: self.is_held(Action::MoveRight),
            up: self.is_held(Action::LookUp),
            down: self.is_held(Action::LookDown),
            jump_pressed: self.pressed.contains(&Action::Jump),
            jump_released: self.released.contains(&Action::Jump),
            dash_pressed: self.pressed.contains(&Action::Dash),
            grub_finder_pressed: self.pressed.contains(&Action::GrubFinder),
            dev_unlock_pressed: self.pressed.contains(&Action::DevUnlock),
        }
    }

    /// Drop gameplay edges once a tick has used them
    pub fn consume_gameplay_edges(&mut self) {
        self.pressed.retain(|action| !action.is_gameplay());
        self.released.retain(|action| !action.is_gameplay());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_latch_until_consumed() {
        let mut mapper = InputMapper::new();
        mapper.press(InputSource::Keyboard, Action::Jump);
        mapper.release(InputSource::Keyboard, Action::Jump);

        // Tapped and released between two ticks
        let input = mapper.player_input();
        assert!(input.jump_pressed);
        assert!(input.jump_released);

        mapper.consume_gameplay_edges();
        let input = mapper.player_input();
        assert!(!input.jump_pressed);
        assert!(!input.jump_released);
    }

    #[test]
    fn test_sources_merge() {
        let mut mapper = InputMapper::new();
        mapper.press(InputSource::Keyboard, Action::MoveRight);
        mapper.press(InputSource::Gamepad, Action::MoveRight);
        mapper.release(InputSource::Keyboard, Action::MoveRight);
        assert!(mapper.player_input().right);

        mapper.release_all(InputSource::Gamepad);
        assert!(!mapper.player_input().right);
    }

    #[test]
    fn test_second_source_does_not_repeat_press() {
        let mut mapper = InputMapper::new();
        mapper.press(InputSource::Keyboard, Action::Dash);
        mapper.consume_gameplay_edges();
        mapper.press(InputSource::Gamepad, Action::Dash);
        assert!(!mapper.player_input().dash_pressed);
    }

    #[test]
    fn test_system_actions_are_taken_once() {
        let mut mapper = InputMapper::new();
        mapper.press(InputSource::Keyboard, Action::ToggleHud);
        mapper.consume_gameplay_edges();
        assert!(mapper.take_pressed(Action::ToggleHud));
        assert!(!mapper.take_pressed(Action::ToggleHud));
    }

    #[test]
    fn test_held_without_edges() {
        let mut mapper = InputMapper::new();
        mapper.press(InputSource::Keyboard, Action::MoveLeft);
        mapper.press(InputSource::Keyboard, Action::LookDown);
        mapper.consume_gameplay_edges();

        let input = mapper.player_input();
        assert!(input.left && input.down);
        assert_eq!(input.movement_x(), -1.0);
    }
}
