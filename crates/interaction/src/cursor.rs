//! Pointer to grid cell mapping, refreshed each frame.

use bevy::prelude::*;

use placement::geometry::position_to_cell;
use placement::types::{ActiveZone, GridCell};
use placement::zones::zone_config;

use crate::viewport::MapViewport;

/// Where the mouse pointer currently is on the map, if anywhere.
#[derive(Resource, Default, Debug)]
pub struct MapCursor {
    /// Pointer position in map-relative coordinates.
    pub map_pos: Option<Vec2>,
    /// The valid grid cell under the pointer, if any.
    pub cell: Option<GridCell>,
}

pub fn update_map_cursor(
    windows: Query<&Window>,
    viewport: Res<MapViewport>,
    zone: Res<ActiveZone>,
    mut cursor: ResMut<MapCursor>,
) {
    cursor.map_pos = None;
    cursor.cell = None;

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(window_pos) = window.cursor_position() else {
        return;
    };
    if !viewport.contains(window_pos) {
        return;
    }

    let map_pos = viewport.to_map(window_pos);
    cursor.map_pos = Some(map_pos);
    cursor.cell = position_to_cell(zone_config(zone.0), map_pos, &viewport.ctx());
}
