//! Colors for the procedural art

use pixel_knight_core::animation::PlayerAction;
use pixel_knight_core::entity::CollectableKind;
use pixel_knight_core::progression::Ability;
use pixel_knight_core::tilemap::TileKind;

use super::canvas::Rgba;

pub const SKY_TOP: Rgba = [18, 20, 36, 255];
pub const SKY_BOTTOM: Rgba = [44, 52, 78, 255];

pub const GRASS_TOP: Rgba = [104, 170, 92, 255];
pub const STONE_EDGE: Rgba = [150, 150, 168, 255];
pub const SPIKE: Rgba = [214, 218, 230, 255];

pub const PLAYER: Rgba = [236, 236, 244, 255];
pub const PLAYER_EYES: Rgba = [20, 20, 28, 255];
pub const CLOAK: Rgba = [46, 34, 70, 255];
pub const HITSTUN: Rgba = [232, 96, 96, 255];

pub const GRUB: Rgba = [120, 230, 140, 255];
pub const JAR: Rgba = [190, 210, 230, 160];
pub const BENCH: Rgba = [130, 92, 60, 255];
pub const BENCH_ACTIVE: Rgba = [220, 190, 120, 255];
pub const EXIT: Rgba = [10, 10, 16, 255];
pub const EXIT_FRAME: Rgba = [200, 180, 120, 255];

pub const HITBOX: Rgba = [255, 60, 60, 200];
pub const CURSOR: Rgba = [255, 255, 255, 180];
pub const GRID_LINE: Rgba = [255, 255, 255, 24];

/// Fill color of a tile body
pub fn tile_fill(kind: TileKind) -> Rgba {
    match kind {
        TileKind::Grass => [70, 58, 48, 255],
        TileKind::Stone => [88, 88, 104, 255],
        TileKind::Decor => [96, 140, 90, 255],
        TileKind::LargeDecor => [60, 92, 70, 255],
        TileKind::Spawners => [200, 60, 200, 160],
        TileKind::Spikes => [60, 60, 72, 255],
    }
}

/// Marker color of a spawner variant in the editor
pub fn spawner_color(variant: u32) -> Rgba {
    match CollectableKind::from_spawner(variant) {
        Some(kind) => collectable_color(kind),
        // Player spawn
        None => [80, 160, 255, 255],
    }
}

pub fn collectable_color(kind: CollectableKind) -> Rgba {
    match kind {
        CollectableKind::Respawn => BENCH,
        CollectableKind::Grub => GRUB,
        CollectableKind::Pickup(ability) => ability_color(ability),
        CollectableKind::Exit => EXIT_FRAME,
    }
}

pub fn ability_color(ability: Ability) -> Rgba {
    match ability {
        Ability::Dash => [235, 235, 245, 255],
        Ability::Cloak => [110, 80, 170, 255],
        Ability::Claw => [230, 120, 60, 255],
        Ability::Wings => [250, 220, 120, 255],
        Ability::GrubFinder => GRUB,
    }
}

/// Body color for the player's current action
pub fn player_color(action: PlayerAction) -> Rgba {
    match action {
        PlayerAction::Cloak => CLOAK,
        PlayerAction::Hitstun => HITSTUN,
        _ => PLAYER,
    }
}

/// Vertical gradient between `top` and `bottom`
pub fn gradient(top: Rgba, bottom: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [
        mix(top[0], bottom[0]),
        mix(top[1], bottom[1]),
        mix(top[2], bottom[2]),
        255,
    ]
}
