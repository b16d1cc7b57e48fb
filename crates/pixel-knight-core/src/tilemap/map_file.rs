//! JSON map files
//!
//! ```json
//! {
//!   "tilemap": { "3;10": { "type": "grass", "variant": 1, "pos": [3, 10] } },
//!   "tile_size": 16,
//!   "offgrid": [ { "type": "decor", "variant": 0, "pos": [52.0, 140.5] } ],
//!   "meta": { "name": "Crossroads", "next_level": 1, "requires": ["claw"] }
//! }
//! ```
//!
//! Grid keys are `"x;y"` cell coordinates and are authoritative over `pos`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tile::{PlacedTile, Tile, TileKind};
use super::Tilemap;
use crate::progression::Ability;

/// Errors raised while reading or writing map files
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write map {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse map: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tile key {0:?}, expected \"x;y\"")]
    InvalidKey(String),

    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),

    #[error("no level {0} in the maps directory")]
    UnknownLevel(usize),
}

/// Level metadata carried alongside the tiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapMeta {
    /// Display name
    pub name: Option<String>,
    /// Level the exit leads to
    pub next_level: Option<usize>,
    /// Abilities needed to enter this level
    pub requires: Vec<Ability>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GridTileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [i32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct OffgridTileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [f32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    tilemap: BTreeMap<String, GridTileRecord>,
    tile_size: i32,
    #[serde(default)]
    offgrid: Vec<OffgridTileRecord>,
    #[serde(default)]
    meta: MapMeta,
}

/// Parse a `"x;y"` grid key
pub fn parse_key(key: &str) -> Result<IVec2, MapError> {
    let (x, y) = key
        .split_once(';')
        .ok_or_else(|| MapError::InvalidKey(key.to_string()))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| MapError::InvalidKey(key.to_string()))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| MapError::InvalidKey(key.to_string()))?;
    Ok(IVec2::new(x, y))
}

/// Format a grid cell as a map key
pub fn format_key(cell: IVec2) -> String {
    format!("{};{}", cell.x, cell.y)
}

impl Tilemap {
    /// Parse a map from JSON text
    pub fn from_json(text: &str) -> Result<Self, MapError> {
        let file: MapFile = serde_json::from_str(text)?;
        if file.tile_size <= 0 {
            return Err(MapError::InvalidTileSize(file.tile_size));
        }

        let mut tilemap = Tilemap::new(file.tile_size);
        for (key, record) in file.tilemap {
            let cell = parse_key(&key)?;
            tilemap.set_tile(cell, Tile::new(record.kind, record.variant));
        }
        tilemap.offgrid = file
            .offgrid
            .into_iter()
            .map(|record| {
                PlacedTile::new(
                    Tile::new(record.kind, record.variant),
                    Vec2::new(record.pos[0], record.pos[1]),
                )
            })
            .collect();
        tilemap.meta = file.meta;
        Ok(tilemap)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, MapError> {
        let tilemap = self
            .iter()
            .map(|(cell, tile)| {
                (
                    format_key(cell),
                    GridTileRecord {
                        kind: tile.kind,
                        variant: tile.variant,
                        pos: [cell.x, cell.y],
                    },
                )
            })
            .collect();
        let offgrid = self
            .offgrid
            .iter()
            .map(|placed| OffgridTileRecord {
                kind: placed.tile.kind,
                variant: placed.tile.variant,
                pos: [placed.pos.x, placed.pos.y],
            })
            .collect();
        let file = MapFile {
            tilemap,
            tile_size: self.tile_size,
            offgrid,
            meta: self.meta.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Load a map from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tilemap = Self::from_json(&text)?;
        log::info!(
            "Loaded map {:?}: {} tiles, {} off-grid",
            path,
            tilemap.len(),
            tilemap.offgrid.len()
        );
        Ok(tilemap)
    }

    /// Save the map to disk (atomic write: temp file, then rename)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let write_err = |source| MapError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, json).map_err(write_err)?;
        std::fs::rename(&temp_path, path).map_err(write_err)?;

        log::info!("Saved map {:?} ({} tiles)", path, self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tilemap": {
            "3;10": {"type": "grass", "variant": 1, "pos": [3, 10]},
            "-2;4": {"type": "spawners", "variant": 2, "pos": [-2, 4]}
        },
        "tile_size": 16,
        "offgrid": [{"type": "decor", "variant": 3, "pos": [52.5, 140.0]}]
    }"#;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("3;10").expect("key"), IVec2::new(3, 10));
        assert_eq!(parse_key("-2;-7").expect("key"), IVec2::new(-2, -7));
        assert!(matches!(parse_key("3,10"), Err(MapError::InvalidKey(_))));
        assert!(matches!(parse_key("a;1"), Err(MapError::InvalidKey(_))));
    }

    #[test]
    fn test_from_json_reads_grid_and_offgrid() {
        let tilemap = Tilemap::from_json(SAMPLE).expect("parse map");
        assert_eq!(tilemap.tile_size, 16);
        assert_eq!(
            tilemap.tile_at(IVec2::new(3, 10)),
            Some(Tile::new(TileKind::Grass, 1))
        );
        assert_eq!(
            tilemap.tile_at(IVec2::new(-2, 4)),
            Some(Tile::new(TileKind::Spawners, 2))
        );
        assert_eq!(tilemap.offgrid.len(), 1);
        assert_eq!(tilemap.offgrid[0].pos, Vec2::new(52.5, 140.0));
        assert_eq!(tilemap.meta, MapMeta::default());
    }

    #[test]
    fn test_unknown_tile_type_is_an_error() {
        let text = r#"{"tilemap": {"0;0": {"type": "lava", "variant": 0, "pos": [0, 0]}}, "tile_size": 16}"#;
        assert!(matches!(Tilemap::from_json(text), Err(MapError::Parse(_))));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let text = r#"{"tilemap": {}, "tile_size": 0}"#;
        assert!(matches!(
            Tilemap::from_json(text),
            Err(MapError::InvalidTileSize(0))
        ));
    }

    #[test]
    fn test_meta_requires_parses_abilities() {
        let text = r#"{"tilemap": {}, "tile_size": 16,
            "meta": {"name": "Ledges", "next_level": 2, "requires": ["claw", "wings"]}}"#;
        let tilemap = Tilemap::from_json(text).expect("parse map");
        assert_eq!(tilemap.meta.name.as_deref(), Some("Ledges"));
        assert_eq!(tilemap.meta.next_level, Some(2));
        assert_eq!(tilemap.meta.requires, vec![Ability::Claw, Ability::Wings]);
    }

    #[test]
    fn test_save_then_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("maps").join("0.json");

        let original = Tilemap::from_json(SAMPLE).expect("parse map");
        original.save(&path).expect("save map");
        assert!(!path.with_extension("tmp").exists());

        let loaded = Tilemap::load(&path).expect("load map");
        assert_eq!(loaded.len(), original.len());
        assert_eq!(loaded.offgrid, original.offgrid);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Tilemap::load("definitely/not/here.json").expect_err("missing map");
        assert!(err.to_string().contains("definitely/not/here.json"));
    }
}
