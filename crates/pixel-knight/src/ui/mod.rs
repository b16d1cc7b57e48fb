//! UI module for PixelKnight

mod editor_panel;
mod hud;

pub use editor_panel::{show_editor_panel, EditorCommand};
pub use hud::{show_hud, DebugStats};
