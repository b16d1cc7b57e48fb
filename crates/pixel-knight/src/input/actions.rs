//! Game action definitions
//!
//! Keyboard and gamepad both map onto these; gameplay and the editor only
//! ever look at actions.

/// All possible game/editor actions that can be triggered by input
///
/// Button mappings (Xbox layout):
/// - A/B = Jump
/// - X/Y, RB/LB, RT/LT = Dash
/// - Left stick / D-pad = Move and look
/// - Start = Pause
/// - Select = Toggle HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    LookUp,
    LookDown,

    // Abilities
    Jump,
    Dash,
    GrubFinder,

    // Development
    DevUnlock,

    // System
    ToggleHud,
    ToggleEditor,
    Pause,
    Quit,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::LookUp,
        Action::LookDown,
        Action::Jump,
        Action::Dash,
        Action::GrubFinder,
        Action::DevUnlock,
        Action::ToggleHud,
        Action::ToggleEditor,
        Action::Pause,
        Action::Quit,
    ];

    /// Actions consumed by the simulation tick rather than the app
    pub fn is_gameplay(self) -> bool {
        matches!(
            self,
            Action::MoveLeft
                | Action::MoveRight
                | Action::LookUp
                | Action::LookDown
                | Action::Jump
                | Action::Dash
                | Action::GrubFinder
                | Action::DevUnlock
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::MoveLeft => "Move left",
            Action::MoveRight => "Move right",
            Action::LookUp => "Look up",
            Action::LookDown => "Look down",
            Action::Jump => "Jump",
            Action::Dash => "Dash",
            Action::GrubFinder => "Grub finder",
            Action::DevUnlock => "Unlock all",
            Action::ToggleHud => "Toggle HUD",
            Action::ToggleEditor => "Toggle editor",
            Action::Pause => "Pause",
            Action::Quit => "Quit",
        }
    }
}
