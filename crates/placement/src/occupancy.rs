//! Cell occupancy lookup.
//!
//! Rebuilt from the item list on demand; N is small (a few dozen venues per
//! zone) so a fresh hash map per query site is cheaper than keeping an index
//! in sync. Resolved positions include optimistic overrides so a drag preview
//! sees pending moves, not just confirmed ones.

use std::collections::HashMap;

use crate::optimistic::OptimisticPositions;
use crate::types::{GridCell, ItemDirectory, ItemId, ZoneId};

#[derive(Debug, Default)]
pub struct OccupancyIndex {
    map: HashMap<(ZoneId, GridCell), ItemId>,
}

impl OccupancyIndex {
    pub fn build(directory: &ItemDirectory, overrides: &OptimisticPositions) -> Self {
        let mut map = HashMap::with_capacity(directory.items.len());
        for item in &directory.items {
            let cell = overrides.override_for(item.id).unwrap_or(item.cell);
            map.insert((item.zone, cell), item.id);
        }
        Self { map }
    }

    pub fn item_at(&self, zone: ZoneId, cell: GridCell) -> Option<ItemId> {
        self.map.get(&(zone, cell)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlacedItem, VenueCategory};

    fn directory() -> ItemDirectory {
        ItemDirectory {
            items: vec![
                PlacedItem {
                    id: ItemId(1),
                    name: "Noodle Bar".into(),
                    category: VenueCategory::Food,
                    zone: ZoneId::Plaza,
                    cell: GridCell::new(1, 1),
                },
                PlacedItem {
                    id: ItemId(2),
                    name: "Arcade Corner".into(),
                    category: VenueCategory::Games,
                    zone: ZoneId::Plaza,
                    cell: GridCell::new(1, 3),
                },
            ],
        }
    }

    #[test]
    fn test_lookup_confirmed_positions() {
        let index = OccupancyIndex::build(&directory(), &OptimisticPositions::default());
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(1, 1)), Some(ItemId(1)));
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(1, 2)), None);
        assert_eq!(index.item_at(ZoneId::Harborwalk, GridCell::new(1, 1)), None);
    }

    #[test]
    fn test_overrides_are_visible() {
        let mut overrides = OptimisticPositions::default();
        overrides.apply(ItemId(1), GridCell::new(2, 4));
        let index = OccupancyIndex::build(&directory(), &overrides);
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(1, 1)), None);
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(2, 4)), Some(ItemId(1)));
    }

    #[test]
    fn test_no_two_items_share_a_cell() {
        let mut overrides = OptimisticPositions::default();
        // A swap applies both sides together, so exclusivity holds mid-flight.
        overrides.apply(ItemId(1), GridCell::new(1, 3));
        overrides.apply(ItemId(2), GridCell::new(1, 1));
        let index = OccupancyIndex::build(&directory(), &overrides);
        assert_eq!(index.len(), 2);
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(1, 3)), Some(ItemId(1)));
        assert_eq!(index.item_at(ZoneId::Plaza, GridCell::new(1, 1)), Some(ItemId(2)));
    }
}
