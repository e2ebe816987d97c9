//! Top toolbar: zone switcher, edit-mode toggle, saving indicator.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use placement::optimistic::{LockPhase, OperationLock};
use placement::types::{ActiveZone, ZoneId};

use sync::fetch::PendingFetch;

use interaction::drag::ActiveDrag;
use interaction::edit_mode::EditMode;
use interaction::keyboard_nav::FocusedItem;
use interaction::viewport::TOP_BAR_HEIGHT;

pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut zone: ResMut<ActiveZone>,
    mut edit: ResMut<EditMode>,
    mut drag: ResMut<ActiveDrag>,
    mut focused: ResMut<FocusedItem>,
    lock: Res<OperationLock>,
    fetching: Res<PendingFetch>,
) {
    let ctx = contexts.ctx_mut();

    egui::TopBottomPanel::top("toolbar")
        .exact_height(TOP_BAR_HEIGHT)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(egui::RichText::new("VenueMap").strong());
                ui.separator();

                for candidate in ZoneId::ALL {
                    let selected = zone.0 == candidate;
                    if ui.selectable_label(selected, candidate.label()).clicked() && !selected {
                        zone.0 = candidate;
                        drag.0 = None;
                        focused.0 = None;
                    }
                }

                ui.separator();
                if edit.permitted {
                    let label = if edit.active { "Done" } else { "Edit layout" };
                    if ui.button(label).clicked() {
                        edit.active = !edit.active;
                        if edit.active {
                            focused.0 = None;
                        } else {
                            drag.0 = None;
                        }
                    }
                }

                if lock.phase() == LockPhase::Committing {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.spinner();
                        ui.label("Saving…");
                    });
                } else if fetching.is_fetching() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.spinner();
                        ui.label("Refreshing…");
                    });
                }
            });
        });
}
