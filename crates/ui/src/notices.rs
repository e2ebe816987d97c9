//! Notice strip below the toolbar.
//!
//! Shows active notices color-coded by priority. Error notices carry a close
//! button; everything else expires on its own.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use placement::notifications::{NoticePriority, NotificationLog};

use interaction::viewport::TOP_BAR_HEIGHT;

const STRIP_HEIGHT: f32 = 26.0;

fn priority_color(priority: NoticePriority) -> egui::Color32 {
    match priority {
        NoticePriority::Error => egui::Color32::from_rgb(255, 90, 90),
        NoticePriority::Warning => egui::Color32::from_rgb(255, 165, 0),
        NoticePriority::Info => egui::Color32::from_rgb(210, 210, 210),
        NoticePriority::Positive => egui::Color32::from_rgb(90, 220, 90),
    }
}

pub fn notices_ui(mut contexts: EguiContexts, mut log: ResMut<NotificationLog>) {
    if log.active.is_empty() {
        return;
    }
    let ctx = contexts.ctx_mut();

    egui::Area::new(egui::Id::new("notice_strip"))
        .fixed_pos(egui::pos2(8.0, TOP_BAR_HEIGHT + 4.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_height(STRIP_HEIGHT);
            let mut dismissed = None;
            ui.horizontal(|ui| {
                for notice in &log.active {
                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(20, 22, 30, 230))
                        .inner_margin(egui::Margin::symmetric(8, 4))
                        .corner_radius(egui::CornerRadius::same(4))
                        .show(ui, |ui| {
                            ui.colored_label(priority_color(notice.priority), &notice.text);
                            if notice.priority == NoticePriority::Error
                                && ui.small_button("x").clicked()
                            {
                                dismissed = Some(notice.id);
                            }
                        });
                }
            });
            if let Some(id) = dismissed {
                log.dismiss(id);
            }
        });
}
