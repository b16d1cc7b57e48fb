//! PixelKnight - 2D action platformer

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pixel_knight::config::GameConfig;
use pixel_knight::{App, LaunchOptions};
use pixel_knight_core::levels::LevelCatalog;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level to start on (defaults to the first level)
    #[arg(long)]
    level: Option<usize>,

    /// Open the level editor on the starting level
    #[arg(long)]
    editor: bool,

    /// Directory containing <n>.json level maps
    #[arg(long)]
    maps_dir: Option<PathBuf>,

    /// Ignore the save file and start from scratch
    #[arg(long)]
    new_game: bool,

    /// Start with every ability unlocked
    #[arg(long)]
    unlock_all: bool,

    /// List available levels and exit
    #[arg(long)]
    list_levels: bool,

    /// Seed for cosmetic randomness
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = GameConfig::load()?;
    if let Some(maps_dir) = args.maps_dir {
        config.levels.maps_dir = maps_dir;
    }
    if let Some(seed) = args.seed {
        config.debug.seed = seed;
    }

    // Handle --list-levels flag
    if args.list_levels {
        list_levels(&config)?;
        return Ok(());
    }

    log::info!("Starting PixelKnight");

    let options = LaunchOptions {
        config,
        start_level: args.level,
        editor: args.editor,
        new_game: args.new_game,
        unlock_all: args.unlock_all,
    };
    pollster::block_on(run(options))
}

async fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let (app, event_loop) = App::new(options).await?;
    App::run(event_loop, app)
}

fn list_levels(config: &GameConfig) -> anyhow::Result<()> {
    let catalog = LevelCatalog::discover(&config.levels.maps_dir)
        .with_context(|| format!("Failed to load levels from {:?}", config.levels.maps_dir))?;

    println!("Levels in {}:", catalog.maps_dir().display());
    for level in catalog.levels() {
        let requires: Vec<&str> = level.requires.iter().map(|a| a.name()).collect();
        let next = level
            .next
            .map_or_else(|| "-".to_string(), |next| next.to_string());
        println!(
            "  {:>3}  {:<24} next: {:<3} requires: {}",
            level.id,
            level.name,
            next,
            if requires.is_empty() {
                "nothing".to_string()
            } else {
                requires.join(", ")
            }
        );
    }
    Ok(())
}
