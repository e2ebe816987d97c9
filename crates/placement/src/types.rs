use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::optimistic::OptimisticPositions;

/// Stable identifier of a placeable venue, assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// A named sub-area of the map with its own grid topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    Plaza,
    Harborwalk,
}

impl ZoneId {
    pub const ALL: [ZoneId; 2] = [ZoneId::Plaza, ZoneId::Harborwalk];

    pub fn label(self) -> &'static str {
        match self {
            ZoneId::Plaza => "Plaza",
            ZoneId::Harborwalk => "Harborwalk",
        }
    }

    /// URL path segment used by the backend.
    pub fn slug(self) -> &'static str {
        match self {
            ZoneId::Plaza => "plaza",
            ZoneId::Harborwalk => "harborwalk",
        }
    }
}

/// Venue category. Drives token styling only; the placement rules never
/// look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueCategory {
    Food,
    Retail,
    Games,
    Service,
}

impl VenueCategory {
    pub fn label(self) -> &'static str {
        match self {
            VenueCategory::Food => "Food",
            VenueCategory::Retail => "Retail",
            VenueCategory::Games => "Games",
            VenueCategory::Service => "Service",
        }
    }
}

/// A `(row, col)` coordinate within a zone grid. Both indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u8,
    pub col: u8,
}

impl GridCell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A venue placed on a zone grid. Owned by the backend; the client treats
/// the confirmed cell as read-only and layers optimistic overrides on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub name: String,
    pub category: VenueCategory,
    pub zone: ZoneId,
    pub cell: GridCell,
}

/// The zone currently shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct ActiveZone(pub ZoneId);

impl Default for ActiveZone {
    fn default() -> Self {
        Self(ZoneId::Plaza)
    }
}

/// Last confirmed item list from the backend, across all zones.
#[derive(Resource, Default)]
pub struct ItemDirectory {
    pub items: Vec<PlacedItem>,
}

impl ItemDirectory {
    pub fn get(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &PlacedItem> {
        self.items.iter().filter(move |i| i.zone == zone)
    }

    /// Replace the directory contents for one zone with a fresh fetch,
    /// leaving other zones untouched.
    pub fn replace_zone(&mut self, zone: ZoneId, items: Vec<PlacedItem>) {
        self.items.retain(|i| i.zone != zone);
        self.items.extend(items);
    }

    /// The cell an item currently resolves to: its optimistic override if one
    /// is pending, otherwise its confirmed cell.
    pub fn resolved_cell(&self, id: ItemId, overrides: &OptimisticPositions) -> Option<GridCell> {
        if let Some(cell) = overrides.override_for(id) {
            return Some(cell);
        }
        self.get(id).map(|i| i.cell)
    }
}
