//! Level discovery and access gating
//!
//! Levels live in a maps directory as `<n>.json`, where `n` is the level id.
//! Anything else in the directory is ignored. With no maps at all the catalog
//! holds a single built-in training level.

use std::path::{Path, PathBuf};

use crate::progression::{Ability, Progression};
use crate::tilemap::{MapError, Tilemap};

/// Default directory scanned for level files
pub const DEFAULT_MAPS_DIR: &str = "maps";

#[derive(Debug, Clone, PartialEq)]
pub struct LevelInfo {
    pub id: usize,
    pub name: String,
    /// Abilities needed to enter
    pub requires: Vec<Ability>,
    /// Level the exit leads to
    pub next: Option<usize>,
    /// Map file; `None` for the built-in level
    pub path: Option<PathBuf>,
}

impl LevelInfo {
    fn from_map(id: usize, path: Option<PathBuf>, tilemap: &Tilemap) -> Self {
        Self {
            id,
            name: tilemap
                .meta
                .name
                .clone()
                .unwrap_or_else(|| format!("Level {}", id)),
            requires: tilemap.meta.requires.clone(),
            next: tilemap.meta.next_level,
            path,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.path.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LevelCatalog {
    maps_dir: PathBuf,
    levels: Vec<LevelInfo>,
}

impl LevelCatalog {
    /// Scan `maps_dir` for `<n>.json` files
    ///
    /// A missing directory is treated like an empty one. Map files that fail to
    /// parse are an error, so a broken level is never silently skipped.
    pub fn discover(maps_dir: impl AsRef<Path>) -> Result<Self, MapError> {
        let maps_dir = maps_dir.as_ref().to_path_buf();
        let mut found: Vec<(usize, PathBuf)> = Vec::new();

        if maps_dir.is_dir() {
            let entries = std::fs::read_dir(&maps_dir).map_err(|source| MapError::Read {
                path: maps_dir.clone(),
                source,
            })?;
            for entry in entries.flatten() {
                let path = entry.path();
                if let Some(id) = level_id(&path) {
                    found.push((id, path));
                }
            }
        }
        found.sort_by_key(|(id, _)| *id);

        let mut levels = Vec::with_capacity(found.len().max(1));
        for (id, path) in found {
            let tilemap = Tilemap::load(&path)?;
            levels.push(LevelInfo::from_map(id, Some(path), &tilemap));
        }

        if levels.is_empty() {
            log::info!("No maps in {:?}, using the built-in training level", maps_dir);
            levels.push(LevelInfo::from_map(0, None, &Tilemap::training_ground()));
        }

        // Without an explicit next level, exits lead to the following id
        let ids: Vec<usize> = levels.iter().map(|level| level.id).collect();
        for level in &mut levels {
            if level.next.is_none() {
                level.next = ids.iter().copied().find(|id| *id > level.id);
            }
        }

        log::info!("Found {} level(s) in {:?}", levels.len(), maps_dir);
        Ok(Self { maps_dir, levels })
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    pub fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    pub fn get(&self, id: usize) -> Option<&LevelInfo> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Lowest level id
    pub fn first(&self) -> usize {
        self.levels.first().map_or(0, |level| level.id)
    }

    /// Path a level is saved to by the editor
    pub fn path_for(&self, id: usize) -> PathBuf {
        self.get(id)
            .and_then(|level| level.path.clone())
            .unwrap_or_else(|| self.maps_dir.join(format!("{}.json", id)))
    }

    /// Load a level's tilemap; the built-in level has no map file
    pub fn load(&self, id: usize) -> Result<Tilemap, MapError> {
        let level = self.get(id).ok_or(MapError::UnknownLevel(id))?;
        match &level.path {
            Some(path) => Tilemap::load(path),
            None => {
                log::debug!("Level {} has no map file, loading the training level", id);
                Ok(Tilemap::training_ground())
            }
        }
    }

    /// Whether the player may enter a level
    pub fn can_enter(&self, id: usize, progression: &Progression) -> bool {
        self.get(id)
            .is_some_and(|level| progression.can_enter(&level.requires))
    }
}

/// Level id from a `<n>.json` file name
fn level_id(path: &Path) -> Option<usize> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::{Tile, TileKind};
    use glam::IVec2;

    fn write_level(dir: &Path, id: usize, requires: Vec<Ability>) {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::ZERO, Tile::new(TileKind::Grass, 0));
        tilemap.meta.requires = requires;
        tilemap
            .save(dir.join(format!("{}.json", id)))
            .expect("save level");
    }

    #[test]
    fn test_level_id_parsing() {
        assert_eq!(level_id(Path::new("maps/3.json")), Some(3));
        assert_eq!(level_id(Path::new("maps/notes.json")), None);
        assert_eq!(level_id(Path::new("maps/3.ron")), None);
    }

    #[test]
    fn test_missing_dir_uses_training_level() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = LevelCatalog::discover(dir.path().join("nope")).expect("discover");
        assert_eq!(catalog.levels().len(), 1);
        let level = &catalog.levels()[0];
        assert!(level.is_builtin());
        assert_eq!(level.name, "Training Ground");
        assert_eq!(level.next, None);

        let tilemap = catalog.load(0).expect("load builtin");
        assert!(!tilemap.is_empty());
    }

    #[test]
    fn test_discovers_sorted_levels_and_links_next() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_level(dir.path(), 2, vec![Ability::Claw]);
        write_level(dir.path(), 0, Vec::new());
        std::fs::write(dir.path().join("readme.txt"), "not a level").expect("write");

        let catalog = LevelCatalog::discover(dir.path()).expect("discover");
        let ids: Vec<usize> = catalog.levels().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(catalog.get(0).and_then(|l| l.next), Some(2));
        assert_eq!(catalog.get(2).and_then(|l| l.next), None);
        assert_eq!(catalog.get(0).map(|l| l.name.as_str()), Some("Level 0"));
        assert_eq!(catalog.first(), 0);
    }

    #[test]
    fn test_gating_by_abilities() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_level(dir.path(), 0, Vec::new());
        write_level(dir.path(), 1, vec![Ability::Claw, Ability::Wings]);
        let catalog = LevelCatalog::discover(dir.path()).expect("discover");

        let mut progression = Progression::new();
        assert!(catalog.can_enter(0, &progression));
        assert!(!catalog.can_enter(1, &progression));
        progression.grant(Ability::Claw);
        progression.grant(Ability::Wings);
        assert!(catalog.can_enter(1, &progression));
        assert!(!catalog.can_enter(7, &progression));
    }

    #[test]
    fn test_broken_map_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("0.json"), "{ nope").expect("write");
        assert!(LevelCatalog::discover(dir.path()).is_err());
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_level(dir.path(), 0, Vec::new());
        let catalog = LevelCatalog::discover(dir.path()).expect("discover");
        assert!(catalog.load(0).is_ok());
        assert!(matches!(catalog.load(5), Err(MapError::UnknownLevel(5))));
    }

    #[test]
    fn test_path_for_new_level() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = LevelCatalog::discover(dir.path()).expect("discover");
        assert_eq!(catalog.path_for(4), dir.path().join("4.json"));
    }
}
