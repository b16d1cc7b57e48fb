//! The game state and its per-tick update order
//!
//! [`Game::tick`] runs one 60 Hz step:
//!
//! 1. Input edges (jump, jump release, dash, grub finder, dev unlock)
//! 2. Camera look
//! 3. Screen fade and the death or level events it raises
//! 4. Camera follow
//! 5. Collectables
//! 6. Player (only while it can move)
//! 7. Particles
//! 8. HUD messages

use std::path::PathBuf;

use glam::Vec2;

use crate::animation::PlayerAction;
use crate::audio::AudioQueue;
use crate::camera::Camera;
use crate::entity::{
    Collectable, CollectableEvent, CollectableKind, Player, PlayerContext, PlayerInput,
    PLAYER_SPAWN_VARIANT,
};
use crate::fade::{FadeEvent, FadeReason, ScreenFade};
use crate::hud::{Hud, HudMessage};
use crate::levels::{LevelCatalog, LevelInfo};
use crate::particles::ParticleSystem;
use crate::progression::{Ability, ProgressError, Progression};
use crate::rng::{seeded, GameRng};
use crate::tilemap::{MapError, TileKind, Tilemap};
use crate::tuning::{CameraTuning, PlayerTuning};
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Where the player starts on a map without a spawn tile
pub const PLAYER_START_POS: Vec2 = Vec2::ZERO;

const MUSIC_TRACK: &str = "music_crossroads";
const MUSIC_VOLUME: f32 = 0.08;

/// Ability hints stay up longer than other messages
pub const HINT_ON_SCREEN: i32 = 480;

/// Shown at an exit with nowhere to go
pub const SEALED_MESSAGE: &str = "The way onward is sealed";

/// Settings fixed for the lifetime of a [`Game`]
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub player: PlayerTuning,
    pub camera: CameraTuning,
    pub seed: u64,
    /// Progress is written here after rescues, pickups and level changes
    pub save_path: Option<PathBuf>,
    pub max_particles: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            camera: CameraTuning::default(),
            seed: 0,
            save_path: None,
            max_particles: ParticleSystem::DEFAULT_MAX_PARTICLES,
        }
    }
}

pub struct Game {
    settings: GameSettings,
    catalog: LevelCatalog,
    level: usize,

    pub tilemap: Tilemap,
    pub player: Player,
    pub collectables: Vec<Collectable>,
    pub particles: ParticleSystem,
    pub camera: Camera,
    pub fade: ScreenFade,
    pub hud: Hud,
    pub progression: Progression,
    pub audio: AudioQueue,

    rng: GameRng,
    spawn: Vec2,
    pending_level: Option<usize>,
    tick_count: u64,
}

impl Game {
    /// Create a game on `start_level`, or the first level of the catalog.
    /// A start level missing from the catalog is an error.
    pub fn new(
        catalog: LevelCatalog,
        progression: Progression,
        settings: GameSettings,
        start_level: Option<usize>,
    ) -> Result<Self, MapError> {
        let view = Vec2::new(DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32);
        let level = start_level.unwrap_or_else(|| catalog.first());
        if catalog.get(level).is_none() {
            return Err(MapError::UnknownLevel(level));
        }

        let mut game = Self {
            tilemap: Tilemap::new(crate::tilemap::TILE_SIZE),
            player: Player::new(PLAYER_START_POS, settings.player),
            collectables: Vec::new(),
            particles: ParticleSystem::with_capacity(settings.max_particles),
            camera: Camera::new(view, settings.camera),
            fade: ScreenFade::new(),
            hud: Hud::new(),
            progression,
            audio: AudioQueue::new(),
            rng: seeded(settings.seed),
            spawn: PLAYER_START_POS,
            pending_level: None,
            tick_count: 0,
            catalog,
            level,
            settings,
        };

        game.load_level(level)?;
        game.audio.music(MUSIC_TRACK, MUSIC_VOLUME);
        Ok(game)
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn level_info(&self) -> Option<&LevelInfo> {
        self.catalog.get(self.level)
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current respawn point
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Grubs on this level that have not been rescued yet
    pub fn grubs_remaining(&self) -> usize {
        self.collectables
            .iter()
            .filter(|c| c.is_uncollected_grub())
            .count()
    }

    /// Load a level, placing the player on its spawn tile
    ///
    /// Spawner tiles are pulled out of the map and turned into collectables,
    /// skipping anything already taken in an earlier visit.
    pub fn load_level(&mut self, id: usize) -> Result<(), MapError> {
        let mut tilemap = self.catalog.load(id)?;
        let spawner_pairs: Vec<(TileKind, u32)> = (0..TileKind::Spawners.variant_count())
            .map(|variant| (TileKind::Spawners, variant))
            .collect();
        let spawners = tilemap.extract(&spawner_pairs, false);

        let mut spawn = PLAYER_START_POS;
        let mut collectables = Vec::new();
        for spawner in spawners {
            if spawner.tile.variant == PLAYER_SPAWN_VARIANT {
                spawn = spawner.pos;
                continue;
            }
            let Some(kind) = CollectableKind::from_spawner(spawner.tile.variant) else {
                log::warn!("Unknown spawner variant {} at {:?}", spawner.tile.variant, spawner.pos);
                continue;
            };
            if kind.is_persistent() && self.progression.is_collected(id, spawner.pos) {
                continue;
            }
            collectables.push(Collectable::new(kind, spawner.pos, tilemap.tile_size));
        }

        self.level = id;
        self.tilemap = tilemap;
        self.collectables = collectables;
        self.particles.clear();
        self.pending_level = None;
        self.spawn = spawn;

        self.player = Player::new(spawn, self.settings.player);
        self.player.abilities = self.progression.abilities;
        self.player.deaths = self.progression.deaths;
        self.camera.center_on(self.player.rect().center());

        let first_visit = !self.progression.visited_levels.contains(&id);
        self.progression.visit(id);
        let name = self
            .level_info()
            .map_or_else(|| format!("Level {}", id), |level| level.name.clone());
        if first_visit {
            self.hud.show(name.clone());
        }

        log::info!(
            "Loaded level {} ({}): {} collectables, spawn {:?}",
            id,
            name,
            self.collectables.len(),
            spawn
        );
        Ok(())
    }

    /// Rescan the maps directory and reload the current level (used after editing)
    pub fn reload_level(&mut self) -> Result<(), MapError> {
        self.catalog = LevelCatalog::discover(self.catalog.maps_dir())?;
        self.load_level(self.level)
    }

    /// Write progress to the configured save file
    pub fn save_progress(&self) -> Result<(), ProgressError> {
        match &self.settings.save_path {
            Some(path) => self.progression.save(path),
            None => Ok(()),
        }
    }

    fn autosave(&self) {
        if let Err(e) = self.save_progress() {
            log::warn!("Failed to save progress: {}", e);
        }
    }

    /// Run one simulation tick
    pub fn tick(&mut self, input: &PlayerInput) {
        self.player.holding_left = input.left;
        self.player.holding_right = input.right;
        self.player.holding_up = input.up;
        self.player.holding_down = input.down;

        self.apply_edges(input);

        self.camera.reset_smoothing();
        self.camera.apply_look(
            self.player.looking_up,
            self.player.looking_down,
            self.player.idle_timer,
        );

        for event in self.fade.tick() {
            self.handle_fade_event(event);
        }

        self.camera.follow(self.player.rect().center());
        if let Some(bounds) = self.tilemap.bounds() {
            self.camera.clamp_to(bounds);
        }

        self.update_collectables();

        if self.player.can_move {
            let mut ctx = PlayerContext {
                tilemap: &self.tilemap,
                particles: &mut self.particles,
                audio: &mut self.audio,
                rng: &mut self.rng,
            };
            let step = self.player.update(&mut ctx, input.movement_x());
            if step.hazard {
                self.fade.start(FadeReason::Death);
            }
        }

        self.particles.update();
        self.hud.update();
        self.tick_count += 1;
    }

    fn apply_edges(&mut self, input: &PlayerInput) {
        let mut ctx = PlayerContext {
            tilemap: &self.tilemap,
            particles: &mut self.particles,
            audio: &mut self.audio,
            rng: &mut self.rng,
        };

        if input.jump_pressed {
            self.player.jump(&mut ctx);
        }
        if input.jump_released {
            self.player.jump_release();
        }
        if input.dash_pressed {
            self.player.dash(&mut ctx);
        }
        if input.grub_finder_pressed {
            let grubs = self
                .collectables
                .iter()
                .filter(|c| c.is_uncollected_grub())
                .map(Collectable::rect);
            if !self.player.grub_pointer(&mut ctx, grubs) && self.player.has(Ability::GrubFinder) {
                log::debug!("Grub finder: nothing left to find");
            }
        }
        if input.dev_unlock_pressed {
            self.progression.grant_all();
            self.player.abilities = self.progression.abilities;
            self.hud.show("All abilities unlocked");
        }
    }

    fn handle_fade_event(&mut self, event: FadeEvent) {
        log::trace!("Fade event {:?}", event);
        match event {
            FadeEvent::FirstFrame(FadeReason::Death) => {
                let mut ctx = PlayerContext {
                    tilemap: &self.tilemap,
                    particles: &mut self.particles,
                    audio: &mut self.audio,
                    rng: &mut self.rng,
                };
                self.player.hitstun(&mut ctx);
            }
            FadeEvent::FirstFrame(FadeReason::LevelTransition) => {}
            FadeEvent::Black(FadeReason::Death) => {
                self.camera.snap();
                self.player.death_warp(self.spawn);
                self.progression.record_death();
            }
            FadeEvent::Black(FadeReason::LevelTransition) => {
                if let Some(next) = self.pending_level.take() {
                    match self.load_level(next) {
                        Ok(()) => self.autosave(),
                        Err(e) => log::error!("Failed to load level {}: {}", next, e),
                    }
                }
                self.camera.snap();
                self.player.can_move = false;
            }
            FadeEvent::FadeInStarted(FadeReason::Death) => {
                self.player.intangibility_timer = self.settings.player.respawn_intangibility;
            }
            FadeEvent::FadeInStarted(FadeReason::LevelTransition) => {}
            FadeEvent::Settling(_) => {
                self.player.set_action(PlayerAction::Idle);
            }
            FadeEvent::Finished(_) => {
                self.camera.reset_smoothing();
                self.player.can_move = true;
                self.player.air_time = 0;
                self.player.set_action(PlayerAction::Idle);
            }
        }
    }

    fn update_collectables(&mut self) {
        let player_rect = self.player.rect();
        let mut events = Vec::new();
        for collectable in &mut self.collectables {
            if let Some(event) = collectable.update(player_rect, &mut self.audio, &mut self.rng) {
                events.push(event);
            }
        }
        self.collectables.retain(|c| !c.done);

        for event in events {
            self.handle_collectable_event(event);
        }
    }

    fn handle_collectable_event(&mut self, event: CollectableEvent) {
        match event {
            CollectableEvent::GrubRescued { pos } => {
                self.progression.record_rescue(self.level, pos);
                self.autosave();
            }
            CollectableEvent::SpawnPoint(pos) => {
                log::debug!("Spawn point set to {:?}", pos);
                self.spawn = pos;
            }
            CollectableEvent::AbilityGranted { ability, pos } => {
                self.progression.grant(ability);
                self.progression.mark_collected(self.level, pos);
                self.player.abilities = self.progression.abilities;
                self.hud.show(ability.name());
                self.hud
                    .push(HudMessage::new(ability.hint()).with_on_screen(HINT_ON_SCREEN));
                self.autosave();
            }
            CollectableEvent::ExitReached => self.try_exit(),
        }
    }

    fn try_exit(&mut self) {
        let Some(next) = self.level_info().and_then(|level| level.next) else {
            self.hud.show_once(SEALED_MESSAGE);
            return;
        };
        let Some(next_level) = self.catalog.get(next) else {
            log::warn!("Exit of level {} leads to unknown level {}", self.level, next);
            self.hud.show_once(SEALED_MESSAGE);
            return;
        };

        if !self.catalog.can_enter(next, &self.progression) {
            let requires = self.progression.abilities.missing(&next_level.requires);
            let names: Vec<&str> = requires.iter().map(|ability| ability.name()).collect();
            self.hud.show_once(format!("Requires: {}", names.join(", ")));
            log::debug!("Exit to level {} blocked, missing {:?}", next, requires);
            return;
        }

        if self.fade.start(FadeReason::LevelTransition) {
            log::info!("Leaving level {} for level {}", self.level, next);
            self.pending_level = Some(next);
            self.player.can_move = false;
        }
    }
}
