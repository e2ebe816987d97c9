use bevy::prelude::*;

pub mod commit;
pub mod cursor;
pub mod drag;
pub mod edit_mode;
pub mod haptics;
pub mod keyboard_nav;
pub mod viewport;

use commit::PendingCommit;
use cursor::MapCursor;
use drag::ActiveDrag;
use edit_mode::EditMode;
use haptics::HapticPulse;
use keyboard_nav::FocusedItem;
use viewport::MapViewport;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapViewport>()
            .init_resource::<MapCursor>()
            .init_resource::<EditMode>()
            .init_resource::<ActiveDrag>()
            .init_resource::<PendingCommit>()
            .init_resource::<FocusedItem>()
            .add_event::<HapticPulse>()
            .add_systems(
                Update,
                (viewport::update_map_viewport, cursor::update_map_cursor).chain(),
            )
            .add_systems(
                Update,
                (
                    edit_mode::toggle_edit_mode,
                    drag::drag_start_mouse,
                    drag::drag_start_touch,
                    drag::drag_update,
                    drag::drag_cancel,
                    drag::drag_release,
                    commit::poll_commit,
                )
                    .chain()
                    .after(cursor::update_map_cursor),
            )
            .add_systems(
                Update,
                (keyboard_nav::keyboard_navigate, haptics::log_haptic_pulses),
            );
    }
}
