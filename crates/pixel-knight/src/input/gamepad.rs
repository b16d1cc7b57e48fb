//! Gamepad support through gilrs
//!
//! The first connected pad is read once per frame and its state is reported to
//! the [`InputMapper`](super::InputMapper) as held actions.

use glam::Vec2;
use gilrs::{Axis, Button, EventType, Gilrs};

use super::{Action, InputMapper, InputSource};

/// Stick deflection below this is treated as centered
pub const DEFAULT_DEADZONE: f32 = 0.15;

/// Deflection past the deadzone needed to count as a direction
const DIRECTION_THRESHOLD: f32 = 0.5;

pub struct Gamepad {
    gilrs: Option<Gilrs>,
    deadzone: f32,
}

impl Gamepad {
    /// Open the gamepad backend; without one the game runs on keyboard only
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                for (id, gamepad) in gilrs.gamepads() {
                    log::info!("Gamepad {}: {}", id, gamepad.name());
                }
                Some(gilrs)
            }
            Err(e) => {
                log::warn!("Gamepad support unavailable: {}", e);
                None
            }
        };
        Self {
            gilrs,
            deadzone: DEFAULT_DEADZONE,
        }
    }

    pub fn has_gamepad(&self) -> bool {
        self.gilrs
            .as_ref()
            .is_some_and(|gilrs| gilrs.gamepads().next().is_some())
    }

    /// Drain pad events and report the active pad's state
    pub fn poll(&mut self, mapper: &mut InputMapper) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };

        // Events update gilrs' cached state
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected => log::info!("Gamepad {} connected", event.id),
                EventType::Disconnected => log::info!("Gamepad {} disconnected", event.id),
                _ => {}
            }
        }

        let Some((_, gp)) = gilrs.gamepads().next() else {
            mapper.release_all(InputSource::Gamepad);
            return;
        };

        // Y inverted so down is positive, like screen space
        let stick = apply_deadzone(
            gp.value(Axis::LeftStickX),
            -gp.value(Axis::LeftStickY),
            self.deadzone,
        );

        let held = |action: Action| -> bool {
            match action {
                Action::MoveLeft => {
                    gp.is_pressed(Button::DPadLeft) || stick.x < -DIRECTION_THRESHOLD
                }
                Action::MoveRight => {
                    gp.is_pressed(Button::DPadRight) || stick.x > DIRECTION_THRESHOLD
                }
                Action::LookUp => gp.is_pressed(Button::DPadUp) || stick.y < -DIRECTION_THRESHOLD,
                Action::LookDown => {
                    gp.is_pressed(Button::DPadDown) || stick.y > DIRECTION_THRESHOLD
                }
                Action::Jump => gp.is_pressed(Button::South) || gp.is_pressed(Button::East),
                Action::Dash => {
                    gp.is_pressed(Button::West)
                        || gp.is_pressed(Button::North)
                        || gp.is_pressed(Button::LeftTrigger)
                        || gp.is_pressed(Button::RightTrigger)
                        || gp.is_pressed(Button::LeftTrigger2)
                        || gp.is_pressed(Button::RightTrigger2)
                }
                Action::GrubFinder => gp.is_pressed(Button::LeftThumb),
                Action::ToggleHud => gp.is_pressed(Button::Select),
                Action::Pause => gp.is_pressed(Button::Start),
                Action::DevUnlock | Action::ToggleEditor | Action::Quit => false,
            }
        };

        for action in Action::ALL {
            mapper.set_held(InputSource::Gamepad, action, held(action));
        }
    }
}

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}

/// Radial deadzone, rescaled so output starts at zero at the deadzone edge
pub fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let stick = Vec2::new(x, y);
    let magnitude = stick.length();
    if magnitude < deadzone {
        return Vec2::ZERO;
    }
    let scaled = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    stick / magnitude * scaled
}
