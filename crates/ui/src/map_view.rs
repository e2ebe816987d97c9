//! Zone map rendering.
//!
//! Pure read-side: paints the grid, the placed tokens, and the drag preview
//! from engine state each frame. All positions come through the coordinate
//! transform, so what is painted is exactly what drag classification sees.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use placement::geometry::{cell_to_position, token_size};
use placement::optimistic::OptimisticPositions;
use placement::types::{ActiveZone, ItemDirectory, PlacedItem, VenueCategory};
use placement::zones::zone_config;

use interaction::drag::{ActiveDrag, DropAction};
use interaction::edit_mode::EditMode;
use interaction::keyboard_nav::FocusedItem;
use interaction::viewport::MapViewport;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

const COLOR_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(24, 26, 32);
const COLOR_CELL_OUTLINE: egui::Color32 = egui::Color32::from_rgb(52, 56, 66);
const COLOR_CELL_OUTLINE_EDIT: egui::Color32 = egui::Color32::from_rgb(90, 96, 110);
const COLOR_FOCUS_RING: egui::Color32 = egui::Color32::from_rgb(120, 180, 255);

const COLOR_DROP_MOVE: egui::Color32 = egui::Color32::from_rgba_premultiplied(40, 110, 40, 140);
const COLOR_DROP_SWAP: egui::Color32 = egui::Color32::from_rgba_premultiplied(120, 90, 20, 140);
const COLOR_DROP_BLOCKED: egui::Color32 = egui::Color32::from_rgba_premultiplied(120, 30, 30, 140);

fn category_color(category: VenueCategory) -> egui::Color32 {
    match category {
        VenueCategory::Food => egui::Color32::from_rgb(230, 150, 60),
        VenueCategory::Retail => egui::Color32::from_rgb(90, 150, 230),
        VenueCategory::Games => egui::Color32::from_rgb(170, 100, 220),
        VenueCategory::Service => egui::Color32::from_rgb(90, 190, 120),
    }
}

fn cell_rect(center: egui::Pos2, token_px: f32) -> egui::Rect {
    egui::Rect::from_center_size(center, egui::vec2(token_px + 8.0, token_px + 8.0))
}

fn draw_token(
    painter: &egui::Painter,
    center: egui::Pos2,
    item: &PlacedItem,
    token_px: f32,
    alpha: u8,
) {
    let color = category_color(item.category).gamma_multiply(f32::from(alpha) / 255.0);
    painter.circle_filled(center, token_px * 0.5, color);
    painter.text(
        center + egui::vec2(0.0, token_px * 0.5 + 2.0),
        egui::Align2::CENTER_TOP,
        &item.name,
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(210, 210, 215),
    );
}

#[allow(clippy::too_many_arguments)]
pub fn map_view_ui(
    mut contexts: EguiContexts,
    viewport: Res<MapViewport>,
    zone: Res<ActiveZone>,
    directory: Res<ItemDirectory>,
    overrides: Res<OptimisticPositions>,
    drag: Res<ActiveDrag>,
    focused: Res<FocusedItem>,
    edit: Res<EditMode>,
) {
    let ctx = contexts.ctx_mut();
    let config = zone_config(zone.0);
    let transform = viewport.ctx();
    let token_px = token_size(config, &transform) * transform.scale();

    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(COLOR_BACKGROUND))
        .show(ctx, |ui| {
            let (_, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());

            // Grid outlines. Brighter while editing so empty cells read as
            // drop targets.
            let outline = if edit.active {
                COLOR_CELL_OUTLINE_EDIT
            } else {
                COLOR_CELL_OUTLINE
            };
            for cell in config.valid_cells() {
                let Some(pos) = cell_to_position(config, cell, &transform) else {
                    continue;
                };
                let center = to_pos2(viewport.to_window(pos));
                painter.rect_stroke(
                    cell_rect(center, token_px),
                    4.0,
                    egui::Stroke::new(1.0, outline),
                    egui::StrokeKind::Inside,
                );
            }

            // Drop preview under the tokens.
            if let Some(state) = drag.0.as_ref() {
                if let Some(candidate) = state.candidate {
                    if let Some(pos) = cell_to_position(config, candidate, &transform) {
                        let fill = match state.action {
                            DropAction::Move(_) => COLOR_DROP_MOVE,
                            DropAction::Swap(_, _) => COLOR_DROP_SWAP,
                            DropAction::Blocked => COLOR_DROP_BLOCKED,
                        };
                        let center = to_pos2(viewport.to_window(pos));
                        painter.rect_filled(cell_rect(center, token_px), 4.0, fill);
                    }
                }
            }

            let dragged = drag.0.as_ref().map(|s| s.item);
            for item in directory.in_zone(zone.0) {
                if dragged == Some(item.id) {
                    continue;
                }
                let Some(cell) = directory.resolved_cell(item.id, &overrides) else {
                    continue;
                };
                let Some(pos) = cell_to_position(config, cell, &transform) else {
                    continue;
                };
                let center = to_pos2(viewport.to_window(pos));
                draw_token(&painter, center, item, token_px, 255);
                if focused.0 == Some(item.id) {
                    painter.rect_stroke(
                        cell_rect(center, token_px).expand(2.0),
                        4.0,
                        egui::Stroke::new(2.0, COLOR_FOCUS_RING),
                        egui::StrokeKind::Outside,
                    );
                }
            }

            // The dragged token rides the pointer, half transparent.
            if let Some(state) = drag.0.as_ref() {
                if let Some(item) = directory.get(state.item) {
                    let center = to_pos2(viewport.origin + state.pointer_pos);
                    draw_token(&painter, center, item, token_px, 128);
                }
            }
        });
}

fn to_pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}
