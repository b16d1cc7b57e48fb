//! Keyboard bindings

use winit::keyboard::KeyCode;

use super::Action;

/// Map a physical key to its action
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyA | KeyCode::ArrowLeft => Action::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => Action::MoveRight,
        KeyCode::KeyW | KeyCode::ArrowUp => Action::LookUp,
        KeyCode::KeyS | KeyCode::ArrowDown => Action::LookDown,
        KeyCode::Space => Action::Jump,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Action::Dash,
        KeyCode::KeyF => Action::GrubFinder,
        KeyCode::KeyV => Action::DevUnlock,
        KeyCode::F3 => Action::ToggleHud,
        KeyCode::Tab => Action::ToggleEditor,
        KeyCode::KeyP => Action::Pause,
        KeyCode::Escape => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Keys listed in the help overlay, one entry per action
pub fn help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("A/D, Left/Right", "Move"),
        ("W/S, Up/Down", "Look"),
        ("Space", Action::Jump.label()),
        ("Shift", Action::Dash.label()),
        ("F", Action::GrubFinder.label()),
        ("V", Action::DevUnlock.label()),
        ("F3", Action::ToggleHud.label()),
        ("Tab", Action::ToggleEditor.label()),
        ("P", Action::Pause.label()),
        ("Esc", Action::Quit.label()),
    ]
}
