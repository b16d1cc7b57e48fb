//! Player, collectables and the tile physics they share

pub mod collectable;
pub mod input;
pub mod physics;
pub mod player;

pub use collectable::{
    Collectable, CollectableEvent, CollectableKind, CollectableState, PLAYER_SPAWN_VARIANT,
};
pub use input::PlayerInput;
pub use physics::{Collisions, PhysicsBody};
pub use player::{DashKind, Player, PlayerContext, PlayerStep};
