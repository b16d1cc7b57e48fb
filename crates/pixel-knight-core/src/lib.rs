//! # PixelKnight core
//!
//! Headless simulation for the PixelKnight platformer. Everything here runs on a
//! fixed 60 tick clock and knows nothing about windows, GPUs or audio devices:
//! the app crate feeds in a [`entity::PlayerInput`] every tick and reads the
//! resulting [`game::Game`] state back out to draw it.

pub mod animation;
pub mod audio;
pub mod camera;
pub mod entity;
pub mod fade;
pub mod game;
pub mod geometry;
pub mod hud;
pub mod levels;
pub mod particles;
pub mod progression;
pub mod rng;
pub mod tilemap;
pub mod timestep;
pub mod tuning;

pub use game::Game;

/// Simulation ticks per second
pub const TICK_RATE: u32 = 60;

/// Size of the low resolution display everything is simulated against
pub const DISPLAY_WIDTH: u32 = 320;
pub const DISPLAY_HEIGHT: u32 = 240;

/// Common imports for internal use
pub mod prelude {
    pub use crate::entity::{Collectable, CollectableKind, Player, PlayerInput};
    pub use crate::geometry::Rect;
    pub use crate::progression::{Abilities, Ability, Progression};
    pub use crate::tilemap::{Tile, TileKind, Tilemap};
    pub use glam::{IVec2, Vec2};
}
