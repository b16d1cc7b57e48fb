//! Side panel for the level editor

use egui::{Color32, CornerRadius, Stroke, StrokeKind, Vec2};
use pixel_knight_core::entity::{CollectableKind, PLAYER_SPAWN_VARIANT};
use pixel_knight_core::tilemap::TileKind;

use crate::editor::EditorState;
use crate::render::palette;

/// Requests from the panel's buttons, handled by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Save,
    Reload,
    Autotile,
}

const KEY_HELP: &[(&str, &str)] = &[
    ("WASD", "Scroll"),
    ("Wheel", "Variant"),
    ("Shift + Wheel", "Tile group"),
    ("G", "Toggle on-grid"),
    ("Left click", "Place"),
    ("Right click", "Remove"),
    ("T", "Autotile"),
    ("Enter", "Save"),
    ("L", "Reload"),
    ("Tab", "Back to game"),
];

/// Show the editor panel
pub fn show_editor_panel(ctx: &egui::Context, editor: &mut EditorState) -> Option<EditorCommand> {
    let mut command = None;

    egui::SidePanel::left("editor_panel")
        .default_width(220.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading(format!("Level {}", editor.level));
            ui.label(editor.path().display().to_string());
            if editor.is_dirty() {
                ui.colored_label(Color32::YELLOW, "Unsaved changes");
            }
            ui.separator();

            ui.label("Tile group:");
            for (index, kind) in TileKind::ALL.iter().enumerate() {
                if ui
                    .selectable_label(editor.group == index, kind.name())
                    .clicked()
                {
                    editor.group = index;
                    editor.variant = 0;
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Variant:");
                let max = editor.kind().variant_count().saturating_sub(1);
                ui.add(egui::Slider::new(&mut editor.variant, 0..=max));
            });
            if editor.kind() == TileKind::Spawners {
                ui.horizontal(|ui| {
                    show_color_chip(ui, palette::spawner_color(editor.variant));
                    ui.label(spawner_name(editor.variant));
                });
            }
            ui.checkbox(&mut editor.on_grid, "On grid");

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    command = Some(EditorCommand::Save);
                }
                if ui.button("Reload").clicked() {
                    command = Some(EditorCommand::Reload);
                }
                if ui.button("Autotile").clicked() {
                    command = Some(EditorCommand::Autotile);
                }
            });

            ui.separator();
            egui::Grid::new("editor_keys")
                .num_columns(2)
                .spacing([8.0, 2.0])
                .show(ui, |ui| {
                    for (key, action) in KEY_HELP {
                        ui.label(*key);
                        ui.label(*action);
                        ui.end_row();
                    }
                });
        });

    command
}

fn spawner_name(variant: u32) -> &'static str {
    match CollectableKind::from_spawner(variant) {
        Some(CollectableKind::Respawn) => "Bench",
        Some(CollectableKind::Grub) => "Grub",
        Some(CollectableKind::Pickup(ability)) => ability.name(),
        Some(CollectableKind::Exit) => "Exit",
        None if variant == PLAYER_SPAWN_VARIANT => "Player spawn",
        None => "Unknown",
    }
}

fn show_color_chip(ui: &mut egui::Ui, color: [u8; 4]) {
    let (response, painter) = ui.allocate_painter(Vec2::new(16.0, 16.0), egui::Sense::hover());
    let fill = Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3]);
    painter.rect_filled(response.rect, CornerRadius::same(3), fill);
    painter.rect_stroke(
        response.rect,
        CornerRadius::same(3),
        Stroke::new(1.0, Color32::WHITE),
        StrokeKind::Outside,
    );
}
