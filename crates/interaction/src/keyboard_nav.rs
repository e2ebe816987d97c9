//! Arrow-key traversal between placed items.
//!
//! Navigation walks the items of the active zone by grid proximity, so focus
//! can only ever land on an occupied cell. It is a view-mode feature: while
//! edit mode is on or a drag is in progress the arrow keys do nothing.

use bevy::prelude::*;

use placement::optimistic::OptimisticPositions;
use placement::types::{ActiveZone, GridCell, ItemDirectory, ItemId};

use crate::drag::ActiveDrag;
use crate::edit_mode::EditMode;

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct FocusedItem(pub Option<ItemId>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Pick the next item to focus.
///
/// Left/Right stay on the current row and take the nearest column in that
/// direction. Up/Down take the nearest row in that direction, ties broken by
/// column distance. With nothing focused, the top-left item is picked. When
/// no item lies in the requested direction the current focus is kept.
pub fn next_focus(
    rendered: &[(ItemId, GridCell)],
    current: Option<ItemId>,
    direction: NavDirection,
) -> Option<ItemId> {
    let from = current.and_then(|id| {
        rendered
            .iter()
            .find(|(item, _)| *item == id)
            .map(|(_, cell)| *cell)
    });
    let Some(from) = from else {
        return rendered
            .iter()
            .min_by_key(|(_, cell)| (cell.row, cell.col))
            .map(|(id, _)| *id);
    };

    let candidate = match direction {
        NavDirection::Right => rendered
            .iter()
            .filter(|(_, c)| c.row == from.row && c.col > from.col)
            .min_by_key(|(_, c)| c.col),
        NavDirection::Left => rendered
            .iter()
            .filter(|(_, c)| c.row == from.row && c.col < from.col)
            .max_by_key(|(_, c)| c.col),
        NavDirection::Up => rendered
            .iter()
            .filter(|(_, c)| c.row < from.row)
            .min_by_key(|(_, c)| (from.row - c.row, c.col.abs_diff(from.col))),
        NavDirection::Down => rendered
            .iter()
            .filter(|(_, c)| c.row > from.row)
            .min_by_key(|(_, c)| (c.row - from.row, c.col.abs_diff(from.col))),
    };
    candidate.map(|(id, _)| *id).or(current)
}

fn pressed_direction(keys: &ButtonInput<KeyCode>) -> Option<NavDirection> {
    if keys.just_pressed(KeyCode::ArrowUp) {
        Some(NavDirection::Up)
    } else if keys.just_pressed(KeyCode::ArrowDown) {
        Some(NavDirection::Down)
    } else if keys.just_pressed(KeyCode::ArrowLeft) {
        Some(NavDirection::Left)
    } else if keys.just_pressed(KeyCode::ArrowRight) {
        Some(NavDirection::Right)
    } else {
        None
    }
}

pub fn keyboard_navigate(
    keys: Res<ButtonInput<KeyCode>>,
    edit: Res<EditMode>,
    drag: Res<ActiveDrag>,
    zone: Res<ActiveZone>,
    directory: Res<ItemDirectory>,
    overrides: Res<OptimisticPositions>,
    mut focused: ResMut<FocusedItem>,
) {
    if edit.active || drag.0.is_some() {
        return;
    }

    let rendered: Vec<(ItemId, GridCell)> = directory
        .in_zone(zone.0)
        .filter_map(|item| {
            directory
                .resolved_cell(item.id, &overrides)
                .map(|cell| (item.id, cell))
        })
        .collect();

    // Focus carried over from another zone, or an item that vanished on
    // refetch, is dropped rather than navigated from.
    if let Some(id) = focused.0 {
        if !rendered.iter().any(|(item, _)| *item == id) {
            focused.0 = None;
        }
    }

    let Some(direction) = pressed_direction(&keys) else {
        return;
    };
    focused.0 = next_focus(&rendered, focused.0, direction);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<(ItemId, GridCell)> {
        vec![
            (ItemId(1), GridCell::new(1, 1)),
            (ItemId(2), GridCell::new(1, 4)),
            (ItemId(3), GridCell::new(2, 2)),
            (ItemId(4), GridCell::new(4, 1)),
        ]
    }

    #[test]
    fn test_no_focus_selects_top_left_item() {
        assert_eq!(
            next_focus(&grid(), None, NavDirection::Right),
            Some(ItemId(1))
        );
    }

    #[test]
    fn test_right_takes_nearest_greater_column_in_row() {
        assert_eq!(
            next_focus(&grid(), Some(ItemId(1)), NavDirection::Right),
            Some(ItemId(2))
        );
    }

    #[test]
    fn test_left_takes_nearest_lesser_column_in_row() {
        assert_eq!(
            next_focus(&grid(), Some(ItemId(2)), NavDirection::Left),
            Some(ItemId(1))
        );
    }

    #[test]
    fn test_down_prefers_nearest_row_then_column_distance() {
        // From (1,1): row 2 beats row 4, and within row 2 the only item
        // is at column 2.
        assert_eq!(
            next_focus(&grid(), Some(ItemId(1)), NavDirection::Down),
            Some(ItemId(3))
        );
        // From (2,2): only remaining lower row is 4.
        assert_eq!(
            next_focus(&grid(), Some(ItemId(3)), NavDirection::Down),
            Some(ItemId(4))
        );
    }

    #[test]
    fn test_up_ties_broken_by_column_proximity() {
        // From (2,2): both row-1 items compete; column 1 is closer than 4.
        assert_eq!(
            next_focus(&grid(), Some(ItemId(3)), NavDirection::Up),
            Some(ItemId(1))
        );
    }

    #[test]
    fn test_focus_kept_when_nothing_lies_in_direction() {
        assert_eq!(
            next_focus(&grid(), Some(ItemId(4)), NavDirection::Down),
            Some(ItemId(4))
        );
        assert_eq!(
            next_focus(&grid(), Some(ItemId(2)), NavDirection::Right),
            Some(ItemId(2))
        );
    }

    /// Any walk from a valid start only ever visits rendered items.
    #[test]
    fn test_navigation_never_leaves_rendered_set() {
        let items = grid();
        let mut current = next_focus(&items, None, NavDirection::Right);
        let walk = [
            NavDirection::Down,
            NavDirection::Right,
            NavDirection::Up,
            NavDirection::Up,
            NavDirection::Left,
            NavDirection::Down,
            NavDirection::Right,
            NavDirection::Down,
            NavDirection::Left,
        ];
        for direction in walk {
            current = next_focus(&items, current, direction);
            let id = current.expect("focus lost during walk");
            assert!(items.iter().any(|(item, _)| *item == id));
        }
    }

    #[test]
    fn test_stale_focus_falls_back_to_first_item() {
        assert_eq!(
            next_focus(&grid(), Some(ItemId(99)), NavDirection::Left),
            Some(ItemId(1))
        );
    }
}
