//! HUD overlay: progress, level name and timed messages

use egui::{Align2, Color32};
use pixel_knight_core::hud::HudMessage;
use pixel_knight_core::progression::Ability;
use pixel_knight_core::Game;

use crate::input::keyboard;
use crate::render::palette;

/// Debug stats for the HUD display
pub struct DebugStats {
    pub fps: f32,
    pub tick: u64,
    pub particle_count: usize,
    pub collectables: usize,
    pub gamepad: bool,
    pub recent_cues: Vec<String>,
}

/// Show the HUD overlay
pub fn show_hud(ctx: &egui::Context, game: &Game, stats: Option<&DebugStats>, paused: bool) {
    egui::Area::new(egui::Id::new("progress_hud"))
        .anchor(Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                if let Some(level) = game.level_info() {
                    ui.label(&level.name);
                }
                ui.label(format!("Grubs rescued: {}", game.progression.grubs_rescued));
                if game.grubs_remaining() > 0 {
                    ui.label(format!("Grubs here: {}", game.grubs_remaining()));
                }
                ui.label(format!("Deaths: {}", game.progression.deaths));
                ui.horizontal(|ui| {
                    for ability in Ability::ALL {
                        if game.progression.has(ability) {
                            let [r, g, b, _] = palette::ability_color(ability);
                            ui.colored_label(Color32::from_rgb(r, g, b), "◆")
                                .on_hover_text(ability.name());
                        }
                    }
                });
                if paused {
                    ui.colored_label(Color32::YELLOW, "PAUSED");
                    ui.separator();
                    egui::Grid::new("pause_controls").show(ui, |ui| {
                        for (keys, label) in keyboard::help_lines() {
                            ui.small(keys);
                            ui.small(label);
                            ui.end_row();
                        }
                    });
                }
            });
        });

    show_messages(ctx, game.hud.messages());

    if let Some(stats) = stats {
        show_debug_stats(ctx, stats);
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_rgba_unmultiplied(0, 0, 0, 180))
        .inner_margin(8.0)
        .outer_margin(0.0)
        .corner_radius(4.0)
}

/// Timed messages, newest at the bottom, faded by their opacity
fn show_messages(ctx: &egui::Context, messages: &[HudMessage]) {
    if messages.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("hud_messages"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -40.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                for message in messages {
                    let alpha = (message.alpha() * 255.0) as u8;
                    let text = egui::RichText::new(&message.text)
                        .size(20.0)
                        .color(Color32::from_white_alpha(alpha));
                    ui.label(text);
                }
            });
        });
}

fn show_debug_stats(ctx: &egui::Context, stats: &DebugStats) {
    egui::Area::new(egui::Id::new("debug_stats"))
        .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.label(format!("FPS: {:.0}", stats.fps));
                ui.label(format!("Tick: {}", stats.tick));
                ui.label(format!("Particles: {}", stats.particle_count));
                ui.label(format!("Collectables: {}", stats.collectables));
                ui.label(if stats.gamepad {
                    "Gamepad: connected"
                } else {
                    "Gamepad: none"
                });
                if !stats.recent_cues.is_empty() {
                    ui.separator();
                    for cue in &stats.recent_cues {
                        ui.small(cue);
                    }
                }
            });
        });
}
