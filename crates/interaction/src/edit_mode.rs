//! Edit-mode gate.
//!
//! Whether the current user *may* edit is decided by the external
//! authorization layer; this resource only mirrors that answer and tracks
//! whether edit mode is currently switched on.

use bevy::prelude::*;

use crate::drag::ActiveDrag;
use crate::keyboard_nav::FocusedItem;

#[derive(Resource, Debug, Clone, Copy)]
pub struct EditMode {
    /// Set by the authorization collaborator; never changed by the engine.
    pub permitted: bool,
    /// Whether the editor has switched edit mode on.
    pub active: bool,
}

impl Default for EditMode {
    fn default() -> Self {
        Self {
            permitted: true,
            active: false,
        }
    }
}

/// Toggle edit mode with E. Leaving edit mode discards any drag in progress;
/// entering it drops keyboard focus (navigation is a view-mode feature).
pub fn toggle_edit_mode(
    keys: Res<ButtonInput<KeyCode>>,
    mut edit: ResMut<EditMode>,
    mut drag: ResMut<ActiveDrag>,
    mut focused: ResMut<FocusedItem>,
) {
    if !keys.just_pressed(KeyCode::KeyE) || !edit.permitted {
        return;
    }
    edit.active = !edit.active;
    if edit.active {
        focused.0 = None;
    } else {
        drag.0 = None;
    }
}
