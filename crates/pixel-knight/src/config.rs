//! Game configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `config.ron` file (if exists)
//! 3. Environment variables prefixed with `PIXELKNIGHT_`
//!
//! Example environment variable: `PIXELKNIGHT_PLAYER__GRAVITY=0.3`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use pixel_knight_core::levels::DEFAULT_MAPS_DIR;
use pixel_knight_core::particles::ParticleSystem;
use pixel_knight_core::progression::DEFAULT_SAVE_PATH;
use pixel_knight_core::tuning::{CameraTuning, PlayerTuning};
use serde::{Deserialize, Serialize};

/// Main game configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub camera: CameraTuning,

    #[serde(default)]
    pub player: PlayerTuning,

    #[serde(default)]
    pub levels: LevelsConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub debug: DebugConfig,
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            title: "PixelKnight".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    /// Directory scanned for `<n>.json` maps
    pub maps_dir: PathBuf,
    /// Level to start on; the first level when unset
    pub start_level: Option<usize>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from(DEFAULT_MAPS_DIR),
            start_level: None,
        }
    }
}

/// Save file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub save_path: PathBuf,
    /// Write progress after rescues, pickups and level changes
    pub autosave: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            autosave: true,
        }
    }
}

/// Debug/development settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show debug stats on startup
    pub show_stats_on_start: bool,
    /// Seed for cosmetic randomness
    pub seed: u64,
    pub max_particles: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_stats_on_start: false,
            seed: 0,
            max_particles: ParticleSystem::DEFAULT_MAX_PARTICLES,
        }
    }
}

impl GameConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `config.ron` file (if exists)
    /// 3. Environment variables prefixed with `PIXELKNIGHT_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Same as [`GameConfig::load`] with a different config file stem
    pub fn load_from(file: &Path) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .add_source(
                Config::try_from(&GameConfig::default())
                    .context("Failed to serialize default configuration")?,
            )
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::from(file)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (PIXELKNIGHT_PLAYER__GRAVITY, etc.)
            .add_source(
                Environment::with_prefix("PIXELKNIGHT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.window.width, 960);
        assert_eq!(config.player.gravity, PlayerTuning::default().gravity);
        assert_eq!(config.camera.smoothing, 10.0);
        assert_eq!(config.levels.maps_dir, PathBuf::from("maps"));
        assert!(config.progression.autosave);
        assert!(!config.debug.show_stats_on_start);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let dir = tempfile::tempdir().expect("tempdir");
        let config = GameConfig::load_from(&dir.path().join("config")).expect("load config");
        assert_eq!(config.window.height, 720);
        assert_eq!(config.player.move_speed, PlayerTuning::default().move_speed);
    }

    #[test]
    fn test_config_file_overrides_some_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("config.ron"),
            "(player: (gravity: 0.3), levels: (maps_dir: \"custom\"), debug: (seed: 7))",
        )
        .expect("write config");

        let config = GameConfig::load_from(&dir.path().join("config")).expect("load config");
        assert_eq!(config.player.gravity, 0.3);
        assert_eq!(config.player.move_speed, PlayerTuning::default().move_speed);
        assert_eq!(config.levels.maps_dir, PathBuf::from("custom"));
        assert_eq!(config.debug.seed, 7);
        assert_eq!(config.window.width, 960);
    }
}
