//! Abilities, grub rescues and the on-disk save
//!
//! Progress is written as RON to `saves/progress.ron` by default. Writes go to
//! a temp file that is renamed into place, so a crash mid-save keeps the old file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default save location, relative to the working directory
pub const DEFAULT_SAVE_PATH: &str = "saves/progress.ron";

/// A movement upgrade picked up in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Dash,
    Cloak,
    Claw,
    Wings,
    GrubFinder,
}

impl Ability {
    pub const ALL: [Ability; 5] = [
        Ability::Dash,
        Ability::Cloak,
        Ability::Claw,
        Ability::Wings,
        Ability::GrubFinder,
    ];

    pub fn flag(self) -> Abilities {
        match self {
            Ability::Dash => Abilities::DASH,
            Ability::Cloak => Abilities::CLOAK,
            Ability::Claw => Abilities::CLAW,
            Ability::Wings => Abilities::WINGS,
            Ability::GrubFinder => Abilities::GRUB_FINDER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ability::Dash => "Mothwing Dash",
            Ability::Cloak => "Shade Cloak",
            Ability::Claw => "Mantis Claw",
            Ability::Wings => "Monarch Wings",
            Ability::GrubFinder => "Grub Finder",
        }
    }

    /// One line shown on the HUD when the ability is picked up
    pub fn hint(self) -> &'static str {
        match self {
            Ability::Dash => "Press SHIFT to dash forward",
            Ability::Cloak => "Your dash now cuts through the dark",
            Ability::Claw => "Jump while sliding on a wall to wall jump",
            Ability::Wings => "Press SPACE in the air to jump again",
            Ability::GrubFinder => "Press F to sense the nearest grub",
        }
    }
}

bitflags! {
    /// Set of owned abilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Abilities: u8 {
        const DASH = 1;
        const CLOAK = 1 << 1;
        const CLAW = 1 << 2;
        const WINGS = 1 << 3;
        const GRUB_FINDER = 1 << 4;
    }
}

impl Abilities {
    pub fn has(&self, ability: Ability) -> bool {
        self.contains(ability.flag())
    }

    /// Whether every ability in `requires` is owned
    pub fn satisfies(&self, requires: &[Ability]) -> bool {
        requires.iter().all(|ability| self.has(*ability))
    }

    /// The abilities in `requires` that are not owned yet
    pub fn missing(&self, requires: &[Ability]) -> Vec<Ability> {
        requires
            .iter()
            .copied()
            .filter(|ability| !self.has(*ability))
            .collect()
    }
}

/// Errors raised while loading or saving progress
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to read save {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write save {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse save: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize save: {0}")]
    Serialize(#[from] ron::Error),
}

/// A collected world object, identified by level and spawn position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectedKey {
    pub level: usize,
    pub x: i32,
    pub y: i32,
}

impl CollectedKey {
    pub fn new(level: usize, pos: Vec2) -> Self {
        Self {
            level,
            x: pos.x as i32,
            y: pos.y as i32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    pub abilities: Abilities,
    pub grubs_rescued: u32,
    pub deaths: u32,
    /// Grubs rescued and pickups taken, never respawned
    pub collected: BTreeSet<CollectedKey>,
    pub visited_levels: BTreeSet<usize>,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, ability: Ability) -> bool {
        self.abilities.has(ability)
    }

    /// Grant an ability; returns false if it was already owned
    pub fn grant(&mut self, ability: Ability) -> bool {
        if self.has(ability) {
            return false;
        }
        self.abilities.insert(ability.flag());
        log::info!("Unlocked ability: {}", ability.name());
        true
    }

    pub fn grant_all(&mut self) {
        self.abilities = Abilities::all();
        log::info!("Unlocked all abilities");
    }

    /// Whether a level with these requirements may be entered
    pub fn can_enter(&self, requires: &[Ability]) -> bool {
        self.abilities.satisfies(requires)
    }

    pub fn is_collected(&self, level: usize, pos: Vec2) -> bool {
        self.collected.contains(&CollectedKey::new(level, pos))
    }

    pub fn mark_collected(&mut self, level: usize, pos: Vec2) {
        self.collected.insert(CollectedKey::new(level, pos));
    }

    pub fn record_rescue(&mut self, level: usize, pos: Vec2) {
        self.grubs_rescued += 1;
        self.mark_collected(level, pos);
        log::info!("Grub rescued ({} total)", self.grubs_rescued);
    }

    pub fn record_death(&mut self) {
        self.deaths += 1;
    }

    pub fn visit(&mut self, level: usize) {
        self.visited_levels.insert(level);
    }

    /// Load progress from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgressError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProgressError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let progression: Progression = ron::from_str(&text)?;
        log::info!(
            "Loaded progress from {:?}: {} grubs, abilities {:?}",
            path,
            progression.grubs_rescued,
            progression.abilities
        );
        Ok(progression)
    }

    /// Load progress, starting fresh when there is no save yet
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ProgressError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No save at {:?}, starting a new game", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save progress (atomic write: temp file, then rename)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProgressError> {
        let path = path.as_ref();
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;

        let write_err = |source| ProgressError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, text).map_err(write_err)?;
        std::fs::rename(&temp_path, path).map_err(write_err)?;

        log::debug!("Saved progress to {:?}", path);
        Ok(())
    }
}
