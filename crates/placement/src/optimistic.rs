//! Optimistic position overrides and the global operation lock.
//!
//! Overrides are client-side hints layered over the confirmed item list while
//! a placement commit is in flight. They never become the source of truth:
//! a successful commit is superseded by the next item fetch, and a failed one
//! rolls its overrides back.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::types::{GridCell, ItemId, ItemDirectory};

/// How long the lock stays engaged after a successful commit, absorbing the
/// latency until the refreshed item list supersedes the optimistic state.
pub const LOCK_COOLDOWN_SECS: f32 = 1.5;

/// Tentative `item -> cell` mappings not yet confirmed by the backend.
#[derive(Resource, Default, Debug)]
pub struct OptimisticPositions {
    overrides: HashMap<ItemId, GridCell>,
}

impl OptimisticPositions {
    pub fn apply(&mut self, item: ItemId, cell: GridCell) {
        self.overrides.insert(item, cell);
    }

    pub fn clear(&mut self, item: ItemId) {
        self.overrides.remove(&item);
    }

    pub fn override_for(&self, item: ItemId) -> Option<GridCell> {
        self.overrides.get(&item).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Opportunistically drop overrides the backend has caught up with: once
    /// an item's confirmed cell matches its override, the hint is stale.
    pub fn reconcile_confirmed(&mut self, directory: &ItemDirectory) {
        self.overrides
            .retain(|id, cell| directory.get(*id).map(|i| i.cell) != Some(*cell));
    }
}

/// Lifecycle of the single global edit lock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LockPhase {
    /// No commit in flight; drags may start.
    #[default]
    Open,
    /// A persistence call is in flight. Held until the call resolves.
    Committing,
    /// Commit succeeded; held for the remaining cooldown seconds.
    Cooldown(f32),
}

/// Global gate consulted at drag-start. One lock for the whole map, not one
/// per item: unrelated edits are serialized on purpose, which keeps at most
/// one persistence call in flight.
#[derive(Resource, Default, Debug)]
pub struct OperationLock {
    phase: LockPhase,
}

impl OperationLock {
    pub fn is_locked(&self) -> bool {
        self.phase != LockPhase::Open
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    /// Engage for the duration of a persistence call.
    pub fn engage(&mut self) {
        self.phase = LockPhase::Committing;
    }

    /// Switch to a timed cooldown (successful commit).
    pub fn cooldown(&mut self, secs: f32) {
        self.phase = LockPhase::Cooldown(secs);
    }

    /// Release immediately (failed commit).
    pub fn release(&mut self) {
        self.phase = LockPhase::Open;
    }

    fn tick(&mut self, dt: f32) {
        if let LockPhase::Cooldown(remaining) = self.phase {
            let remaining = remaining - dt;
            self.phase = if remaining > 0.0 {
                LockPhase::Cooldown(remaining)
            } else {
                LockPhase::Open
            };
        }
    }
}

pub fn tick_operation_lock(time: Res<Time>, mut lock: ResMut<OperationLock>) {
    lock.tick(time.delta_secs());
}
