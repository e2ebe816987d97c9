//! Wire payloads for placement commits.

use serde::{Deserialize, Serialize};

use placement::types::{GridCell, ItemId, ZoneId};

/// A move or swap request. For a swap, `conflicting_item_id` names the item
/// already occupying the target and `conflicting_item_target_cell` is the
/// dragged item's original cell; the backend applies both sides atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub item_id: ItemId,
    pub zone: ZoneId,
    pub target_cell: GridCell,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conflicting_item_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conflicting_item_target_cell: Option<GridCell>,
}

impl PlacementRequest {
    pub fn move_to(item_id: ItemId, zone: ZoneId, target_cell: GridCell) -> Self {
        Self {
            item_id,
            zone,
            target_cell,
            conflicting_item_id: None,
            conflicting_item_target_cell: None,
        }
    }

    pub fn swap(
        item_id: ItemId,
        zone: ZoneId,
        target_cell: GridCell,
        other: ItemId,
        other_target: GridCell,
    ) -> Self {
        Self {
            item_id,
            zone,
            target_cell,
            conflicting_item_id: Some(other),
            conflicting_item_target_cell: Some(other_target),
        }
    }

    pub fn is_swap(&self) -> bool {
        self.conflicting_item_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_payload_omits_conflict_fields() {
        let req = PlacementRequest::move_to(ItemId(7), ZoneId::Plaza, GridCell::new(1, 2));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "itemId": 7,
                "zone": "Plaza",
                "targetCell": { "row": 1, "col": 2 },
            })
        );
    }

    #[test]
    fn test_swap_payload_carries_both_sides() {
        let req = PlacementRequest::swap(
            ItemId(7),
            ZoneId::Harborwalk,
            GridCell::new(1, 3),
            ItemId(9),
            GridCell::new(1, 1),
        );
        assert!(req.is_swap());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "itemId": 7,
                "zone": "Harborwalk",
                "targetCell": { "row": 1, "col": 3 },
                "conflictingItemId": 9,
                "conflictingItemTargetCell": { "row": 1, "col": 1 },
            })
        );
    }

    #[test]
    fn test_request_round_trips() {
        let req = PlacementRequest::swap(
            ItemId(1),
            ZoneId::Plaza,
            GridCell::new(2, 2),
            ItemId(2),
            GridCell::new(2, 1),
        );
        let json = serde_json::to_string(&req).unwrap();
        let back: PlacementRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
