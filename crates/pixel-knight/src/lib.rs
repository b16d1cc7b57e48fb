//! # PixelKnight
//!
//! Window, input, rendering and editor frontend for the PixelKnight
//! platformer. The simulation itself lives in `pixel-knight-core`.

pub mod app;
pub mod audio;
pub mod config;
pub mod editor;
pub mod input;
pub mod render;
pub mod ui;

pub use app::{App, LaunchOptions};
