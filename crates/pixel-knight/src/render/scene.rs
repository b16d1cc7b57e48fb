//! Draws the game state onto the canvas
//!
//! Everything is placeholder art built from rectangles: tiles, the knight,
//! collectables and particles. Draw order is background, tiles, collectables,
//! player, particles, then the screen fade on top.

use glam::{IVec2, Vec2};
use pixel_knight_core::animation::PlayerAction;
use pixel_knight_core::entity::{Collectable, CollectableKind, CollectableState, Player};
use pixel_knight_core::particles::ParticleSystem;
use pixel_knight_core::tilemap::{Tile, TileKind, Tilemap};
use pixel_knight_core::Game;

use super::canvas::{shade, with_alpha, Canvas};
use super::palette;
use crate::editor::EditorState;

/// Optional overlays
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    pub show_hitboxes: bool,
}

/// Render one frame of gameplay
pub fn draw_game(canvas: &mut Canvas, game: &Game, options: SceneOptions) {
    let scroll = game.camera.render_scroll();

    draw_background(canvas);
    draw_tilemap(canvas, &game.tilemap, scroll);
    for collectable in &game.collectables {
        draw_collectable(canvas, collectable, scroll);
    }
    draw_player(canvas, &game.player, scroll);
    draw_particles(canvas, &game.particles, game.player.pos(), scroll);

    if options.show_hitboxes {
        let rect = game.player.rect();
        canvas.outline_rect(
            rect.x - scroll.x,
            rect.y - scroll.y,
            rect.w,
            rect.h,
            palette::HITBOX,
        );
        for collectable in &game.collectables {
            let rect = collectable.rect();
            canvas.outline_rect(
                rect.x - scroll.x,
                rect.y - scroll.y,
                rect.w,
                rect.h,
                palette::HITBOX,
            );
        }
    }

    let fade = game.fade.alpha.clamp(0, 255) as u8;
    if fade > 0 {
        canvas.fade(fade);
    }
}

/// Render the level editor: raw map, grid lines and the tile preview
pub fn draw_editor(canvas: &mut Canvas, editor: &EditorState) {
    let scroll = editor.render_scroll();
    draw_background(canvas);
    draw_grid_lines(canvas, editor.tilemap.tile_size, scroll);
    draw_tilemap(canvas, &editor.tilemap, scroll);

    if let Some(pos) = editor.preview_pos() {
        let tile = editor.current_tile();
        let size = tile.kind.footprint(editor.tilemap.tile_size);
        draw_tile(canvas, tile, pos, editor.tilemap.tile_size);
        canvas.outline_rect(pos.x, pos.y, size.x, size.y, palette::CURSOR);
    }
}

fn draw_grid_lines(canvas: &mut Canvas, tile_size: i32, scroll: IVec2) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let ts = tile_size.max(1);
    let mut x = -scroll.x.rem_euclid(ts);
    while x < w {
        canvas.fill_rect(x, 0, 1, h, palette::GRID_LINE);
        x += ts;
    }
    let mut y = -scroll.y.rem_euclid(ts);
    while y < h {
        canvas.fill_rect(0, y, w, 1, palette::GRID_LINE);
        y += ts;
    }
}

pub fn draw_background(canvas: &mut Canvas) {
    let height = canvas.height() as i32;
    let width = canvas.width() as i32;
    for y in 0..height {
        let color = palette::gradient(
            palette::SKY_TOP,
            palette::SKY_BOTTOM,
            y as f32 / height.max(1) as f32,
        );
        canvas.fill_rect(0, y, width, 1, color);
    }
}

/// Draw off-grid tiles, then the visible grid cells
pub fn draw_tilemap(canvas: &mut Canvas, tilemap: &Tilemap, scroll: IVec2) {
    let ts = tilemap.tile_size;
    for placed in &tilemap.offgrid {
        let pos = placed.pos.floor().as_ivec2() - scroll;
        draw_tile(canvas, placed.tile, pos, ts);
    }

    let view = IVec2::new(canvas.width() as i32, canvas.height() as i32);
    for cell in tilemap.visible_cells(scroll, view) {
        if let Some(tile) = tilemap.tile_at(cell) {
            draw_tile(canvas, tile, cell * ts - scroll, ts);
        }
    }
}

/// Draw a single tile with its top-left corner at `pos` (screen pixels)
pub fn draw_tile(canvas: &mut Canvas, tile: Tile, pos: IVec2, tile_size: i32) {
    let size = tile.kind.footprint(tile_size);
    let fill = palette::tile_fill(tile.kind);

    match tile.kind {
        TileKind::Grass | TileKind::Stone => {
            canvas.fill_rect(pos.x, pos.y, size.x, size.y, fill);
            let edge = if tile.kind == TileKind::Grass {
                palette::GRASS_TOP
            } else {
                palette::STONE_EDGE
            };
            let edges = exposed_edges(tile.variant);
            if edges.top {
                let depth = if tile.kind == TileKind::Grass { 4 } else { 2 };
                canvas.fill_rect(pos.x, pos.y, size.x, depth, edge);
            }
            if edges.bottom {
                canvas.fill_rect(pos.x, pos.y + size.y - 2, size.x, 2, shade(fill, 0.7));
            }
            if edges.left {
                canvas.fill_rect(pos.x, pos.y, 2, size.y, shade(edge, 0.8));
            }
            if edges.right {
                canvas.fill_rect(pos.x + size.x - 2, pos.y, 2, size.y, shade(edge, 0.8));
            }
        }
        TileKind::Decor => {
            // Tufts of different heights per variant
            let height = 3 + tile.variant as i32 * 2;
            for i in 0..3 {
                let x = pos.x + 3 + i * 4;
                let h = height - (i % 2) * 2;
                canvas.fill_rect(x, pos.y + size.y - h, 2, h, fill);
            }
        }
        TileKind::LargeDecor => {
            let trunk = shade(fill, 0.6);
            canvas.fill_rect(pos.x + size.x / 2 - 2, pos.y + size.y / 2, 4, size.y / 2, trunk);
            let crown = 6 + tile.variant as i32 * 3;
            canvas.fill_rect(
                pos.x + size.x / 2 - crown,
                pos.y + size.y / 2 - crown,
                crown * 2,
                crown + 2,
                fill,
            );
        }
        TileKind::Spawners => {
            let color = palette::spawner_color(tile.variant);
            let inner = with_alpha(color, 0.5);
            canvas.fill_rect(pos.x + 2, pos.y + 2, size.x - 4, size.y - 4, inner);
            canvas.outline_rect(pos.x, pos.y, size.x, size.y, color);
        }
        TileKind::Spikes => {
            canvas.fill_rect(pos.x, pos.y + size.y / 2, size.x, size.y / 2, fill);
            let points = 4;
            let width = size.x / points;
            for i in 0..points {
                let x = pos.x + i * width;
                for step in 0..width / 2 {
                    let h = size.y / 2 * (step + 1) / (width / 2).max(1);
                    let top = pos.y + size.y / 2 - h;
                    canvas.fill_rect(x + step, top, 1, h, palette::SPIKE);
                    canvas.fill_rect(x + width - 1 - step, top, 1, h, palette::SPIKE);
                }
            }
        }
    }
}

struct Edges {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

/// Sides without a same-kind neighbour for an autotiled variant
fn exposed_edges(variant: u32) -> Edges {
    Edges {
        top: matches!(variant, 0..=2),
        bottom: matches!(variant, 4..=6),
        left: matches!(variant, 0 | 6 | 7),
        right: matches!(variant, 2..=4),
    }
}

fn draw_collectable(canvas: &mut Canvas, collectable: &Collectable, scroll: IVec2) {
    let rect = collectable.rect();
    let pos = IVec2::new(rect.x, rect.y) - scroll;
    let size = collectable.size;
    let frame = collectable.animation.image_index() as i32;

    match collectable.kind {
        CollectableKind::Grub => {
            let bob = match collectable.state {
                CollectableState::Alert => frame % 2,
                _ => (frame / 2) % 2,
            };
            if collectable.state == CollectableState::Collecting {
                // Grub burrows away as the collect animation plays
                let left = 1.0 - collectable.animation.progress();
                let h = ((6.0 * left).round() as i32).max(1);
                canvas.fill_rect(pos.x + 5, pos.y + size.y - h, 6, h, palette::GRUB);
            } else {
                canvas.fill_rect(pos.x + 1, pos.y + 1, size.x - 2, size.y - 1, palette::JAR);
                let jar_edge = shade(palette::JAR, 1.2);
                canvas.outline_rect(pos.x + 1, pos.y + 1, size.x - 2, size.y - 1, jar_edge);
                canvas.fill_rect(pos.x + 5, pos.y + 7 - bob, 6, 7, palette::GRUB);
                canvas.put_pixel(pos.x + 7, pos.y + 9 - bob, palette::PLAYER_EYES);
                canvas.put_pixel(pos.x + 9, pos.y + 9 - bob, palette::PLAYER_EYES);
            }
        }
        CollectableKind::Respawn => {
            let color = if collectable.active {
                palette::BENCH_ACTIVE
            } else {
                palette::BENCH
            };
            canvas.fill_rect(pos.x, pos.y + size.y - 8, size.x, 3, color);
            canvas.fill_rect(pos.x + 2, pos.y + size.y - 5, 2, 5, shade(color, 0.7));
            canvas.fill_rect(pos.x + size.x - 4, pos.y + size.y - 5, 2, 5, shade(color, 0.7));
            canvas.fill_rect(pos.x + 1, pos.y + 2, 2, size.y - 10, shade(color, 0.8));
        }
        CollectableKind::Pickup(ability) => {
            let color = palette::ability_color(ability);
            let pulse = frame % 4;
            let glow = 4 + pulse;
            let center = pos + size / 2;
            canvas.fill_rect(
                center.x - glow,
                center.y - glow,
                glow * 2,
                glow * 2,
                with_alpha(color, 0.3),
            );
            canvas.fill_rect(center.x - 3, center.y - 3, 6, 6, color);
        }
        CollectableKind::Exit => {
            canvas.fill_rect(pos.x + 2, pos.y - size.y, size.x - 4, size.y * 2, palette::EXIT);
            canvas.outline_rect(
                pos.x + 1,
                pos.y - size.y - 1,
                size.x - 2,
                size.y * 2 + 1,
                palette::EXIT_FRAME,
            );
        }
    }
}

fn draw_player(canvas: &mut Canvas, player: &Player, scroll: IVec2) {
    let rect = player.rect();
    let pos = IVec2::new(rect.x, rect.y) - scroll;
    let action = player.action();
    let color = with_alpha(palette::player_color(action), player.opacity as f32 / 255.0);

    let (body_y, body_h) = match action {
        PlayerAction::Kneel => (pos.y + 3, rect.h - 3),
        _ => (pos.y, rect.h),
    };

    if player.is_dashing() {
        // Motion streak behind the knight
        let dir = if player.body.flip { 1 } else { -1 };
        for i in 1..4 {
            canvas.fill_rect(
                pos.x + dir * i * 3,
                body_y + 4,
                rect.w,
                body_h - 8,
                with_alpha(color, 0.5 / i as f32),
            );
        }
    }

    canvas.fill_rect(pos.x, body_y, rect.w, body_h, color);

    // Horns
    canvas.fill_rect(pos.x, body_y - 3, 1, 3, color);
    canvas.fill_rect(pos.x + rect.w - 1, body_y - 3, 1, 3, color);

    let eye_y = match action {
        PlayerAction::LookUp => body_y + 2,
        PlayerAction::LookDown => body_y + 5,
        _ => body_y + 3,
    };
    let eyes = with_alpha(palette::PLAYER_EYES, player.opacity as f32 / 255.0);
    let eye_x = if player.body.flip {
        pos.x + 1
    } else {
        pos.x + rect.w - 4
    };
    canvas.fill_rect(eye_x, eye_y, 1, 2, eyes);
    canvas.fill_rect(eye_x + 2, eye_y, 1, 2, eyes);
}

fn draw_particles(
    canvas: &mut Canvas,
    particles: &ParticleSystem,
    player_pos: Vec2,
    scroll: IVec2,
) {
    for particle in particles.iter() {
        let center = particle.render_pos(player_pos).round().as_ivec2() - scroll;
        let size = particle.kind.size();
        let color = particle.kind.color();
        let alpha = (color[3] as u32 * particle.alpha() as u32 / 255) as u8;
        canvas.fill_rect(
            center.x - size / 2,
            center.y - size / 2,
            size,
            size,
            [color[0], color[1], color[2], alpha],
        );
    }
}
