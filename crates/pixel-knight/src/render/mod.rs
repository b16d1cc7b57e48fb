//! Rendering module for PixelKnight

pub mod canvas;
pub mod palette;
mod renderer;
pub mod scene;

pub use canvas::Canvas;
pub use renderer::{Letterbox, Renderer};
pub use scene::{draw_game, SceneOptions};
