//! Tile kinds and placed tiles

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Tile group, serialized with the names the map files use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    Spawners,
    Spikes,
}

impl TileKind {
    /// All groups in palette order
    pub const ALL: [TileKind; 6] = [
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Decor,
        TileKind::LargeDecor,
        TileKind::Spawners,
        TileKind::Spikes,
    ];

    /// Tiles the player collides with
    pub fn is_physics(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone | TileKind::Spikes)
    }

    /// Tiles whose variant is picked from their neighbours
    pub fn is_autotiled(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Standing on these kills the player
    pub fn is_hazard(self) -> bool {
        matches!(self, TileKind::Spikes)
    }

    /// Number of variants available in the palette
    pub fn variant_count(self) -> u32 {
        match self {
            TileKind::Grass | TileKind::Stone => 9,
            TileKind::Decor => 4,
            TileKind::LargeDecor => 3,
            TileKind::Spawners => 9,
            TileKind::Spikes => 4,
        }
    }

    /// Pixel footprint of one tile of this kind
    pub fn footprint(self, tile_size: i32) -> IVec2 {
        match self {
            TileKind::LargeDecor => IVec2::new(tile_size * 2, tile_size * 2),
            _ => IVec2::splat(tile_size),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Spawners => "spawners",
            TileKind::Spikes => "spikes",
        }
    }
}

/// A tile as stored in a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u32,
}

impl Tile {
    pub const fn new(kind: TileKind, variant: u32) -> Self {
        Self { kind, variant }
    }
}

/// A tile with a pixel position: off-grid decor and extracted spawners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub tile: Tile,
    pub pos: Vec2,
}

impl PlacedTile {
    pub fn new(tile: Tile, pos: Vec2) -> Self {
        Self { tile, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_kinds() {
        assert!(TileKind::Grass.is_physics());
        assert!(TileKind::Spikes.is_physics());
        assert!(!TileKind::Decor.is_physics());
        assert!(!TileKind::Spawners.is_physics());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&TileKind::LargeDecor).expect("serialize");
        assert_eq!(json, "\"large_decor\"");
        for kind in TileKind::ALL {
            assert_eq!(serde_json::to_string(&kind).expect("serialize"), format!("\"{}\"", kind.name()));
        }
    }
}
