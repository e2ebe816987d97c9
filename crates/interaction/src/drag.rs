//! Drag/drop controller.
//!
//! One explicit `DragState` value holds everything about the gesture in
//! flight; systems read and replace it rather than mutating scattered
//! globals. Mouse and touch share the classification and commit path and
//! differ only in gesture detection.
//!
//! Lifecycle: `Idle -> Dragging -> Committing -> (cooldown | rollback) -> Idle`.
//! A drag can only start while edit mode is on, the operation lock is open,
//! and no commit is in flight.

use bevy::prelude::*;

use placement::geometry::position_to_cell;
use placement::occupancy::OccupancyIndex;
use placement::optimistic::{OperationLock, OptimisticPositions};
use placement::types::{ActiveZone, GridCell, ItemDirectory, ItemId, ZoneId};
use placement::zones::zone_config;

use sync::api::ApiHandle;

use crate::commit::{plan_commit, start_commit, PendingCommit};
use crate::cursor::MapCursor;
use crate::edit_mode::EditMode;
use crate::haptics::{HapticKind, HapticPulse};
use crate::viewport::MapViewport;

/// Which input device owns the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch(u64),
}

/// What dropping at the current candidate cell would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Candidate cell is free.
    Move(GridCell),
    /// Candidate cell is occupied by another item; dropping exchanges cells.
    Swap(GridCell, ItemId),
    /// No valid candidate, or the item's own cell. Dropping is a no-op.
    Blocked,
}

/// State of one drag gesture, created at drag-start and destroyed at
/// drag-end.
#[derive(Debug, Clone)]
pub struct DragState {
    pub item: ItemId,
    pub zone: ZoneId,
    /// Cell the item resolved to when the drag started; the rollback target.
    pub origin: GridCell,
    pub pointer: PointerKind,
    /// Last known pointer position in map coordinates.
    pub pointer_pos: Vec2,
    pub candidate: Option<GridCell>,
    pub action: DropAction,
}

#[derive(Resource, Default)]
pub struct ActiveDrag(pub Option<DragState>);

/// Classify a drop candidate. Recomputed on every pointer move so the
/// preview and the eventual commit always agree.
pub fn classify_drop(
    dragged: ItemId,
    origin: GridCell,
    candidate: Option<GridCell>,
    zone: ZoneId,
    occupancy: &OccupancyIndex,
) -> DropAction {
    let Some(cell) = candidate else {
        return DropAction::Blocked;
    };
    if cell == origin {
        return DropAction::Blocked;
    }
    match occupancy.item_at(zone, cell) {
        None => DropAction::Move(cell),
        Some(id) if id == dragged => DropAction::Blocked,
        Some(other) => DropAction::Swap(cell, other),
    }
}

/// Drag-start gate: edit mode on and permitted, lock open, nothing already
/// in flight.
pub fn may_start_drag(
    edit: &EditMode,
    lock: &OperationLock,
    commit_pending: bool,
    drag_active: bool,
) -> bool {
    edit.permitted && edit.active && !lock.is_locked() && !commit_pending && !drag_active
}

fn begin_drag(
    zone: ZoneId,
    map_pos: Vec2,
    cell: GridCell,
    pointer: PointerKind,
    directory: &ItemDirectory,
    overrides: &OptimisticPositions,
) -> Option<DragState> {
    let occupancy = OccupancyIndex::build(directory, overrides);
    let item = occupancy.item_at(zone, cell)?;
    Some(DragState {
        item,
        zone,
        origin: cell,
        pointer,
        pointer_pos: map_pos,
        candidate: Some(cell),
        action: DropAction::Blocked,
    })
}

pub fn drag_start_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<MapCursor>,
    edit: Res<EditMode>,
    lock: Res<OperationLock>,
    pending: Res<PendingCommit>,
    zone: Res<ActiveZone>,
    directory: Res<ItemDirectory>,
    overrides: Res<OptimisticPositions>,
    mut drag: ResMut<ActiveDrag>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if !may_start_drag(&edit, &lock, pending.0.is_some(), drag.0.is_some()) {
        return;
    }
    let (Some(map_pos), Some(cell)) = (cursor.map_pos, cursor.cell) else {
        return;
    };
    drag.0 = begin_drag(zone.0, map_pos, cell, PointerKind::Mouse, &directory, &overrides);
}

pub fn drag_start_touch(
    touches: Res<Touches>,
    viewport: Res<MapViewport>,
    edit: Res<EditMode>,
    lock: Res<OperationLock>,
    pending: Res<PendingCommit>,
    zone: Res<ActiveZone>,
    directory: Res<ItemDirectory>,
    overrides: Res<OptimisticPositions>,
    mut drag: ResMut<ActiveDrag>,
    mut haptics: EventWriter<HapticPulse>,
) {
    for touch in touches.iter_just_pressed() {
        if !may_start_drag(&edit, &lock, pending.0.is_some(), drag.0.is_some()) {
            return;
        }
        let window_pos = touch.position();
        if !viewport.contains(window_pos) {
            continue;
        }
        let map_pos = viewport.to_map(window_pos);
        let Some(cell) = position_to_cell(zone_config(zone.0), map_pos, &viewport.ctx()) else {
            continue;
        };
        let started = begin_drag(
            zone.0,
            map_pos,
            cell,
            PointerKind::Touch(touch.id()),
            &directory,
            &overrides,
        );
        if started.is_some() {
            drag.0 = started;
            haptics.send(HapticPulse::new(HapticKind::Start));
            return;
        }
    }
}

/// Track the pointer and reclassify the candidate cell on every move.
pub fn drag_update(
    windows: Query<&Window>,
    touches: Res<Touches>,
    viewport: Res<MapViewport>,
    directory: Res<ItemDirectory>,
    overrides: Res<OptimisticPositions>,
    mut drag: ResMut<ActiveDrag>,
) {
    let Some(state) = drag.0.as_mut() else {
        return;
    };

    let window_pos = match state.pointer {
        PointerKind::Mouse => windows
            .get_single()
            .ok()
            .and_then(|w| w.cursor_position()),
        PointerKind::Touch(id) => touches.get_pressed(id).map(|t| t.position()),
    };
    if let Some(pos) = window_pos {
        state.pointer_pos = viewport.to_map(pos);
    }

    let config = zone_config(state.zone);
    state.candidate = position_to_cell(config, state.pointer_pos, &viewport.ctx());
    let occupancy = OccupancyIndex::build(&directory, &overrides);
    state.action = classify_drop(state.item, state.origin, state.candidate, state.zone, &occupancy);
}

/// On release, a `move` or `swap` drop becomes a commit; a `blocked` drop is
/// discarded without touching any state.
#[allow(clippy::too_many_arguments)]
pub fn drag_release(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    api: Res<ApiHandle>,
    mut drag: ResMut<ActiveDrag>,
    mut overrides: ResMut<OptimisticPositions>,
    mut lock: ResMut<OperationLock>,
    mut pending: ResMut<PendingCommit>,
) {
    let released = match drag.0.as_ref().map(|s| s.pointer) {
        Some(PointerKind::Mouse) => buttons.just_released(MouseButton::Left),
        Some(PointerKind::Touch(id)) => touches.just_released(id),
        None => false,
    };
    if !released {
        return;
    }

    let Some(state) = drag.0.take() else {
        return;
    };
    let via_touch = matches!(state.pointer, PointerKind::Touch(_));
    let Some(plan) = plan_commit(&state) else {
        return; // blocked drop: no-op, no network call
    };
    start_commit(plan, via_touch, &mut overrides, &mut lock, &mut pending, &api);
}

/// A touch the OS ended without a release (incoming call, system gesture
/// takeover) arrives as a cancel, never a release. A touch id that silently
/// vanished from the tracker counts too, so a dead id can never pin the
/// session.
pub fn touch_interrupted(touches: &Touches, id: u64) -> bool {
    touches.just_canceled(id)
        || (touches.get_pressed(id).is_none() && !touches.just_released(id))
}

/// Escape, right-click, or an OS-interrupted touch abandons the gesture
/// before commit.
pub fn drag_cancel(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut drag: ResMut<ActiveDrag>,
) {
    let Some(state) = drag.0.as_ref() else {
        return;
    };
    if keys.just_pressed(KeyCode::Escape) || buttons.just_pressed(MouseButton::Right) {
        drag.0 = None;
        return;
    }
    if let PointerKind::Touch(id) = state.pointer {
        if touch_interrupted(&touches, id) {
            drag.0 = None;
        }
    }
}
