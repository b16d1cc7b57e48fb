//! In-game level editor
//!
//! Edits the raw map of one level, spawner tiles included. Tiles are placed
//! with the mouse; the camera scrolls with the movement keys.

use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};
use pixel_knight_core::levels::LevelCatalog;
use pixel_knight_core::tilemap::{MapError, PlacedTile, Tile, TileKind, Tilemap, TILE_SIZE};

/// Camera scroll per tick in pixels
pub const CAMERA_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorButton {
    Place,
    Remove,
}

pub struct EditorState {
    pub level: usize,
    pub path: PathBuf,
    pub tilemap: Tilemap,
    pub scroll: Vec2,
    /// Index into [`TileKind::ALL`]
    pub group: usize,
    pub variant: u32,
    pub on_grid: bool,
    /// Cursor in display pixels, `None` while outside the display
    cursor: Option<Vec2>,
    placing: bool,
    removing: bool,
    shifting: bool,
    dirty: bool,
}

impl EditorState {
    /// Open a level's map, starting from an empty map when it has no file yet
    pub fn open(catalog: &LevelCatalog, level: usize) -> Result<Self, MapError> {
        let path = catalog.path_for(level);
        let tilemap = if path.exists() {
            Tilemap::load(&path)?
        } else if catalog.get(level).is_some() {
            catalog.load(level)?
        } else {
            log::info!("Level {} does not exist yet, starting an empty map", level);
            Tilemap::new(TILE_SIZE)
        };
        log::info!("Editing level {} ({:?})", level, path);
        Ok(Self::with_tilemap(level, path, tilemap))
    }

    pub fn with_tilemap(level: usize, path: PathBuf, tilemap: Tilemap) -> Self {
        Self {
            level,
            path,
            tilemap,
            scroll: Vec2::ZERO,
            group: 0,
            variant: 0,
            on_grid: true,
            cursor: None,
            placing: false,
            removing: false,
            shifting: false,
            dirty: false,
        }
    }

    pub fn kind(&self) -> TileKind {
        TileKind::ALL[self.group % TileKind::ALL.len()]
    }

    /// Tile placed by a left click
    pub fn current_tile(&self) -> Tile {
        Tile::new(self.kind(), self.variant)
    }

    /// Unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn render_scroll(&self) -> IVec2 {
        self.scroll.as_ivec2()
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<Vec2>) {
        self.cursor = cursor;
    }

    pub fn set_shift(&mut self, shifting: bool) {
        self.shifting = shifting;
    }

    /// Cursor in world pixels
    pub fn cursor_world(&self) -> Option<Vec2> {
        self.cursor.map(|cursor| cursor + self.render_scroll().as_vec2())
    }

    /// Grid cell under the cursor
    pub fn cursor_cell(&self) -> Option<IVec2> {
        self.cursor_world().map(|pos| self.tilemap.cell_of(pos))
    }

    pub fn cycle_group(&mut self, delta: i32) {
        let count = TileKind::ALL.len() as i32;
        self.group = (self.group as i32 + delta).rem_euclid(count) as usize;
        self.variant = 0;
    }

    pub fn cycle_variant(&mut self, delta: i32) {
        let count = self.kind().variant_count().max(1) as i32;
        self.variant = (self.variant as i32 + delta).rem_euclid(count) as u32;
    }

    /// Mouse wheel: variants, or tile groups while shift is held.
    /// Positive `steps` scroll up.
    pub fn wheel(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let delta = -steps.signum();
        if self.shifting {
            self.cycle_group(delta);
        } else {
            self.cycle_variant(delta);
        }
    }

    pub fn toggle_grid(&mut self) {
        self.on_grid = !self.on_grid;
        log::debug!("Editor on-grid: {}", self.on_grid);
    }

    pub fn button_down(&mut self, button: EditorButton) {
        match button {
            EditorButton::Place => {
                self.placing = true;
                // Off-grid tiles go down once per click
                if !self.on_grid {
                    if let Some(pos) = self.cursor_world() {
                        self.tilemap
                            .offgrid
                            .push(PlacedTile::new(self.current_tile(), pos));
                        self.dirty = true;
                    }
                }
            }
            EditorButton::Remove => self.removing = true,
        }
    }

    pub fn button_up(&mut self, button: EditorButton) {
        match button {
            EditorButton::Place => self.placing = false,
            EditorButton::Remove => self.removing = false,
        }
    }

    /// Whether a mouse button is held
    pub fn is_painting(&self) -> bool {
        self.placing || self.removing
    }

    /// One editor tick: scroll by `movement` (-1..=1 per axis), then paint
    pub fn update(&mut self, movement: IVec2) {
        self.scroll += movement.as_vec2() * CAMERA_SPEED;

        let Some(cell) = self.cursor_cell() else {
            return;
        };

        if self.placing && self.on_grid {
            let tile = self.current_tile();
            if self.tilemap.set_tile(cell, tile) != Some(tile) {
                self.dirty = true;
            }
        }

        if self.removing {
            if self.tilemap.remove_tile(cell).is_some() {
                self.dirty = true;
            }
            if let Some(pos) = self.cursor_world() {
                if self.tilemap.remove_offgrid_at(pos) > 0 {
                    self.dirty = true;
                }
            }
        }
    }

    /// Where the tile under the cursor would go, in display pixels
    pub fn preview_pos(&self) -> Option<IVec2> {
        if self.is_painting() {
            return None;
        }
        if self.on_grid {
            let cell = self.cursor_cell()?;
            Some(cell * self.tilemap.tile_size - self.render_scroll())
        } else {
            self.cursor.map(|cursor| cursor.floor().as_ivec2())
        }
    }

    pub fn autotile(&mut self) -> usize {
        let changed = self.tilemap.autotile();
        if changed > 0 {
            self.dirty = true;
        }
        changed
    }

    pub fn save(&mut self) -> Result<(), MapError> {
        self.tilemap.save(&self.path)?;
        self.dirty = false;
        log::info!("Saved level {} to {:?}", self.level, self.path);
        Ok(())
    }

    /// Throw away edits and reread the map file
    pub fn reload(&mut self) -> Result<(), MapError> {
        if !self.path.exists() {
            log::warn!("{:?} does not exist yet, nothing to reload", self.path);
            return Ok(());
        }
        self.tilemap = Tilemap::load(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> EditorState {
        EditorState::with_tilemap(0, PathBuf::from("0.json"), Tilemap::new(TILE_SIZE))
    }

    #[test]
    fn test_scroll_speed() {
        let mut editor = editor();
        editor.update(IVec2::new(1, -1));
        editor.update(IVec2::new(1, -1));
        assert_eq!(editor.scroll, Vec2::new(4.0, -4.0));
    }

    #[test]
    fn test_place_on_grid_while_held() {
        let mut editor = editor();
        editor.set_cursor(Some(Vec2::new(20.0, 5.0)));
        editor.button_down(EditorButton::Place);
        editor.update(IVec2::ZERO);
        editor.set_cursor(Some(Vec2::new(40.0, 5.0)));
        editor.update(IVec2::ZERO);
        editor.button_up(EditorButton::Place);

        assert_eq!(editor.tilemap.len(), 2);
        assert_eq!(
            editor.tilemap.tile_at(IVec2::new(1, 0)),
            Some(Tile::new(TileKind::Grass, 0))
        );
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_offgrid_places_once_per_click() {
        let mut editor = editor();
        editor.toggle_grid();
        editor.scroll = Vec2::new(100.0, 0.0);
        editor.set_cursor(Some(Vec2::new(7.0, 9.0)));
        editor.button_down(EditorButton::Place);
        for _ in 0..10 {
            editor.update(IVec2::ZERO);
        }
        editor.button_up(EditorButton::Place);

        assert_eq!(editor.tilemap.offgrid.len(), 1);
        assert_eq!(editor.tilemap.offgrid[0].pos, Vec2::new(107.0, 9.0));
        assert_eq!(editor.tilemap.len(), 0);
    }

    #[test]
    fn test_remove_clears_grid_and_offgrid() {
        let mut editor = editor();
        editor.tilemap.set_tile(IVec2::ZERO, Tile::new(TileKind::Stone, 1));
        editor
            .tilemap
            .offgrid
            .push(PlacedTile::new(Tile::new(TileKind::Decor, 0), Vec2::new(2.0, 2.0)));

        editor.set_cursor(Some(Vec2::new(4.0, 4.0)));
        editor.button_down(EditorButton::Remove);
        editor.update(IVec2::ZERO);

        assert!(editor.tilemap.is_empty());
    }

    #[test]
    fn test_wheel_cycles_variant_and_group() {
        let mut editor = editor();
        editor.wheel(1);
        assert_eq!(editor.variant, TileKind::Grass.variant_count() - 1);
        editor.wheel(-1);
        assert_eq!(editor.variant, 0);

        editor.set_shift(true);
        editor.wheel(-1);
        assert_eq!(editor.kind(), TileKind::Stone);
        editor.wheel(1);
        editor.wheel(1);
        assert_eq!(editor.kind(), *TileKind::ALL.last().expect("kinds"));
        assert_eq!(editor.variant, 0);
    }

    #[test]
    fn test_preview_hidden_while_painting() {
        let mut editor = editor();
        editor.set_cursor(Some(Vec2::new(20.0, 20.0)));
        assert_eq!(editor.preview_pos(), Some(IVec2::new(16, 16)));
        editor.button_down(EditorButton::Remove);
        assert_eq!(editor.preview_pos(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("3.json");
        let mut editor = EditorState::with_tilemap(3, path.clone(), Tilemap::new(TILE_SIZE));
        editor.tilemap.set_tile(IVec2::new(0, 0), Tile::new(TileKind::Spawners, 2));
        editor.save().expect("save");
        assert!(!editor.is_dirty());

        editor.tilemap.set_tile(IVec2::new(5, 0), Tile::new(TileKind::Stone, 0));
        editor.reload().expect("reload");
        assert_eq!(editor.tilemap.len(), 1);

        let catalog = LevelCatalog::discover(dir.path()).expect("discover");
        let reopened = EditorState::open(&catalog, 3).expect("open");
        assert_eq!(
            reopened.tilemap.tile_at(IVec2::ZERO),
            Some(Tile::new(TileKind::Spawners, 2))
        );
    }

    #[test]
    fn test_open_new_level_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = LevelCatalog::discover(dir.path()).expect("discover");
        let editor = EditorState::open(&catalog, 4).expect("open");
        assert!(editor.tilemap.is_empty());
        assert_eq!(editor.path(), dir.path().join("4.json").as_path());
    }
}
