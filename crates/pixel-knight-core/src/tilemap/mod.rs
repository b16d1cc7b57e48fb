//! Grid tilemap with off-grid decoration
//!
//! Grid tiles are keyed by cell; the cell containing a pixel is found with
//! floor division so negative coordinates land in the right cell. Only grid
//! tiles of a physics kind ever collide.

mod autotile;
pub mod map_file;
mod tile;

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::geometry::Rect;

pub use autotile::autotile_variant;
pub use map_file::{MapError, MapMeta};
pub use tile::{PlacedTile, Tile, TileKind};

/// Default tile edge in pixels
pub const TILE_SIZE: i32 = 16;

/// Radius of the block searched around a position for collisions
const NEARBY_RADIUS: i32 = 2;

#[derive(Debug, Clone, Default)]
pub struct Tilemap {
    pub tile_size: i32,
    grid: HashMap<IVec2, Tile>,
    /// Decoration and spawners placed at pixel positions, drawn behind the grid
    pub offgrid: Vec<PlacedTile>,
    pub meta: MapMeta,
}

impl Tilemap {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            grid: HashMap::new(),
            offgrid: Vec::new(),
            meta: MapMeta::default(),
        }
    }

    /// Built-in level used when no map files exist: a grass floor crossed by a
    /// stone wall, with a player spawn and one grub
    pub fn training_ground() -> Self {
        let mut tilemap = Self::new(TILE_SIZE);
        for i in 0..20 {
            tilemap.set_tile(IVec2::new(10, 5 + i), Tile::new(TileKind::Stone, 1));
        }
        for i in 0..20 {
            tilemap.set_tile(IVec2::new(3 + i, 10), Tile::new(TileKind::Grass, 1));
        }
        tilemap.set_tile(IVec2::new(5, 9), Tile::new(TileKind::Spawners, 2));
        tilemap.set_tile(IVec2::new(8, 9), Tile::new(TileKind::Spawners, 1));
        tilemap.meta.name = Some("Training Ground".to_string());
        tilemap
    }

    /// Grid cell containing a pixel position
    pub fn cell_of(&self, pos: Vec2) -> IVec2 {
        let ts = self.tile_size as f32;
        IVec2::new((pos.x / ts).floor() as i32, (pos.y / ts).floor() as i32)
    }

    /// Pixel position of a cell's top-left corner
    pub fn cell_origin(&self, cell: IVec2) -> Vec2 {
        (cell * self.tile_size).as_vec2()
    }

    /// Rect covering a grid cell
    pub fn cell_rect(&self, cell: IVec2) -> Rect {
        Rect::new(
            cell.x * self.tile_size,
            cell.y * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Tiles in the 5x5 block around the cell containing `pos`
    pub fn tiles_nearby(&self, pos: Vec2) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        let center = self.cell_of(pos);
        (-NEARBY_RADIUS..=NEARBY_RADIUS)
            .flat_map(|dx| (-NEARBY_RADIUS..=NEARBY_RADIUS).map(move |dy| IVec2::new(dx, dy)))
            .filter_map(move |offset| {
                let cell = center + offset;
                self.grid.get(&cell).map(|tile| (cell, *tile))
            })
    }

    /// Collision rects of the physics tiles near `pos`
    pub fn physics_rects_nearby(&self, pos: Vec2) -> impl Iterator<Item = Rect> + '_ {
        self.tiles_nearby(pos)
            .filter(|(_, tile)| tile.kind.is_physics())
            .map(move |(cell, _)| self.cell_rect(cell))
    }

    /// Grid tile directly under the cell containing `pos`
    pub fn tile_below(&self, pos: Vec2) -> Option<Tile> {
        self.tile_at(self.cell_of(pos) + IVec2::Y)
    }

    pub fn tile_at(&self, cell: IVec2) -> Option<Tile> {
        self.grid.get(&cell).copied()
    }

    /// Place a grid tile, returning the one it replaced
    pub fn set_tile(&mut self, cell: IVec2, tile: Tile) -> Option<Tile> {
        self.grid.insert(cell, tile)
    }

    pub fn remove_tile(&mut self, cell: IVec2) -> Option<Tile> {
        self.grid.remove(&cell)
    }

    /// Whether a physics tile covers the pixel
    pub fn solid_at(&self, point: Vec2) -> bool {
        self.tile_at(self.cell_of(point))
            .is_some_and(|tile| tile.kind.is_physics())
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        self.grid.iter().map(|(cell, tile)| (*cell, *tile))
    }

    /// Number of grid tiles
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.offgrid.is_empty()
    }

    /// Pull out every tile matching one of `pairs`
    ///
    /// Off-grid matches come first in placement order, then grid matches in
    /// row-major order with their cell converted to a pixel position. Matches
    /// are removed from the map unless `keep` is set.
    pub fn extract(&mut self, pairs: &[(TileKind, u32)], keep: bool) -> Vec<PlacedTile> {
        let matches = |tile: &Tile| pairs.contains(&(tile.kind, tile.variant));
        let mut found = Vec::new();

        found.extend(self.offgrid.iter().filter(|p| matches(&p.tile)).copied());
        if !keep {
            self.offgrid.retain(|p| !matches(&p.tile));
        }

        let mut cells: Vec<IVec2> = self
            .grid
            .iter()
            .filter(|(_, tile)| matches(*tile))
            .map(|(cell, _)| *cell)
            .collect();
        cells.sort_by_key(|cell| (cell.y, cell.x));

        for cell in cells {
            let tile = if keep {
                self.grid.get(&cell).copied()
            } else {
                self.grid.remove(&cell)
            };
            if let Some(tile) = tile {
                found.push(PlacedTile::new(tile, self.cell_origin(cell)));
            }
        }

        log::debug!("Extracted {} tiles (keep: {})", found.len(), keep);
        found
    }

    /// Re-pick grass and stone variants from their neighbours
    pub fn autotile(&mut self) -> usize {
        let updates: Vec<(IVec2, u32)> = self
            .grid
            .iter()
            .filter(|(_, tile)| tile.kind.is_autotiled())
            .filter_map(|(cell, tile)| {
                let variant = autotile_variant(|offset| {
                    self.grid
                        .get(&(*cell + offset))
                        .is_some_and(|n| n.kind == tile.kind)
                })?;
                (variant != tile.variant).then_some((*cell, variant))
            })
            .collect();

        for (cell, variant) in &updates {
            if let Some(tile) = self.grid.get_mut(cell) {
                tile.variant = *variant;
            }
        }
        log::debug!("Autotile changed {} tiles", updates.len());
        updates.len()
    }

    /// Pixel bounds of all grid tiles
    pub fn bounds(&self) -> Option<Rect> {
        self.grid
            .keys()
            .map(|cell| self.cell_rect(*cell))
            .reduce(|acc, rect| acc.union(&rect))
    }

    /// Grid cells intersecting a view of `size` pixels scrolled to `offset`
    pub fn visible_cells(&self, offset: IVec2, size: IVec2) -> impl Iterator<Item = IVec2> {
        let ts = self.tile_size;
        let min = IVec2::new(offset.x.div_euclid(ts), offset.y.div_euclid(ts));
        let max = IVec2::new(
            (offset.x + size.x).div_euclid(ts),
            (offset.y + size.y).div_euclid(ts),
        );
        (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| IVec2::new(x, y)))
    }

    /// Remove the off-grid tiles whose footprint covers `point`
    pub fn remove_offgrid_at(&mut self, point: Vec2) -> usize {
        let ts = self.tile_size;
        let before = self.offgrid.len();
        self.offgrid.retain(|placed| {
            let rect = Rect::from_pos(placed.pos, placed.tile.kind.footprint(ts));
            !rect.contains_point(point)
        });
        before - self.offgrid.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_floors_negative_positions() {
        let tilemap = Tilemap::new(16);
        assert_eq!(tilemap.cell_of(Vec2::new(15.9, 16.0)), IVec2::new(0, 1));
        assert_eq!(tilemap.cell_of(Vec2::new(-0.5, -16.0)), IVec2::new(-1, -1));
        assert_eq!(tilemap.cell_of(Vec2::new(-17.0, 0.0)), IVec2::new(-2, 0));
    }

    #[test]
    fn test_tiles_nearby_is_five_by_five() {
        let mut tilemap = Tilemap::new(16);
        for x in -5..5 {
            for y in -5..5 {
                tilemap.set_tile(IVec2::new(x, y), Tile::new(TileKind::Stone, 0));
            }
        }
        let nearby: Vec<_> = tilemap.tiles_nearby(Vec2::new(8.0, 8.0)).collect();
        assert_eq!(nearby.len(), 25);
        assert!(nearby.iter().all(|(cell, _)| cell.x.abs() <= 2 && cell.y.abs() <= 2));
    }

    #[test]
    fn test_physics_rects_skip_decor() {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::new(0, 1), Tile::new(TileKind::Grass, 0));
        tilemap.set_tile(IVec2::new(1, 1), Tile::new(TileKind::Decor, 0));
        tilemap.set_tile(IVec2::new(-1, 1), Tile::new(TileKind::Spikes, 0));

        let rects: Vec<_> = tilemap.physics_rects_nearby(Vec2::ZERO).collect();
        assert_eq!(rects.len(), 2);
        assert!(rects.contains(&Rect::new(0, 16, 16, 16)));
        assert!(rects.contains(&Rect::new(-16, 16, 16, 16)));
    }

    #[test]
    fn test_tile_below_and_solid_at() {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::new(2, 3), Tile::new(TileKind::Spikes, 1));
        assert_eq!(
            tilemap.tile_below(Vec2::new(40.0, 40.0)),
            Some(Tile::new(TileKind::Spikes, 1))
        );
        assert!(tilemap.solid_at(Vec2::new(33.0, 49.0)));
        assert!(!tilemap.solid_at(Vec2::new(33.0, 30.0)));
    }

    #[test]
    fn test_extract_removes_unless_keep() {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::new(4, 2), Tile::new(TileKind::Spawners, 1));
        tilemap.set_tile(IVec2::new(1, 2), Tile::new(TileKind::Spawners, 1));
        tilemap.set_tile(IVec2::new(0, 0), Tile::new(TileKind::Spawners, 0));
        tilemap.offgrid.push(PlacedTile::new(
            Tile::new(TileKind::Spawners, 2),
            Vec2::new(3.5, 7.0),
        ));

        let pairs = [(TileKind::Spawners, 1), (TileKind::Spawners, 2)];
        let kept = tilemap.extract(&pairs, true);
        assert_eq!(kept.len(), 3);
        assert_eq!(tilemap.len(), 3);

        let taken = tilemap.extract(&pairs, false);
        assert_eq!(taken[0].pos, Vec2::new(3.5, 7.0));
        assert_eq!(taken[1].pos, Vec2::new(16.0, 32.0));
        assert_eq!(taken[2].pos, Vec2::new(64.0, 32.0));
        assert_eq!(tilemap.len(), 1);
        assert!(tilemap.offgrid.is_empty());
    }

    #[test]
    fn test_autotile_floor_row() {
        let mut tilemap = Tilemap::new(16);
        for x in 0..3 {
            tilemap.set_tile(IVec2::new(x, 0), Tile::new(TileKind::Grass, 4));
            tilemap.set_tile(IVec2::new(x, 1), Tile::new(TileKind::Grass, 4));
        }
        tilemap.autotile();
        assert_eq!(tilemap.tile_at(IVec2::new(0, 0)).map(|t| t.variant), Some(0));
        assert_eq!(tilemap.tile_at(IVec2::new(1, 0)).map(|t| t.variant), Some(1));
        assert_eq!(tilemap.tile_at(IVec2::new(2, 0)).map(|t| t.variant), Some(2));
        assert_eq!(tilemap.tile_at(IVec2::new(1, 1)).map(|t| t.variant), Some(5));
    }

    #[test]
    fn test_autotile_ignores_other_kinds() {
        let mut tilemap = Tilemap::new(16);
        tilemap.set_tile(IVec2::new(0, 0), Tile::new(TileKind::Grass, 3));
        tilemap.set_tile(IVec2::new(1, 0), Tile::new(TileKind::Stone, 3));
        assert_eq!(tilemap.autotile(), 0);
    }

    #[test]
    fn test_bounds() {
        let mut tilemap = Tilemap::new(16);
        assert_eq!(tilemap.bounds(), None);
        tilemap.set_tile(IVec2::new(-1, 0), Tile::new(TileKind::Stone, 0));
        tilemap.set_tile(IVec2::new(2, 3), Tile::new(TileKind::Stone, 0));
        assert_eq!(tilemap.bounds(), Some(Rect::new(-16, 0, 64, 64)));
    }

    #[test]
    fn test_visible_cells_cover_view() {
        let tilemap = Tilemap::new(16);
        let cells: Vec<_> = tilemap
            .visible_cells(IVec2::new(-8, 0), IVec2::new(32, 16))
            .collect();
        assert_eq!(cells.len(), 3 * 2);
        assert_eq!(cells[0], IVec2::new(-1, 0));
        assert_eq!(cells[cells.len() - 1], IVec2::new(1, 1));
    }

    #[test]
    fn test_remove_offgrid_at_uses_footprint() {
        let mut tilemap = Tilemap::new(16);
        tilemap.offgrid.push(PlacedTile::new(
            Tile::new(TileKind::LargeDecor, 0),
            Vec2::new(0.0, 0.0),
        ));
        tilemap.offgrid.push(PlacedTile::new(
            Tile::new(TileKind::Decor, 0),
            Vec2::new(100.0, 100.0),
        ));
        assert_eq!(tilemap.remove_offgrid_at(Vec2::new(20.0, 20.0)), 1);
        assert_eq!(tilemap.offgrid.len(), 1);
        assert_eq!(tilemap.remove_offgrid_at(Vec2::new(50.0, 50.0)), 0);
    }

    #[test]
    fn test_training_ground_has_spawn() {
        let mut tilemap = Tilemap::training_ground();
        let spawns = tilemap.extract(&[(TileKind::Spawners, 2)], true);
        assert_eq!(spawns.len(), 1);
        assert_eq!(tilemap.tile_at(IVec2::new(10, 10)).map(|t| t.kind), Some(TileKind::Grass));
        assert_eq!(tilemap.tile_at(IVec2::new(10, 20)).map(|t| t.kind), Some(TileKind::Stone));
    }
}
