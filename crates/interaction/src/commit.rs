//! Commit orchestration.
//!
//! A drop that classifies as `move` or `swap` becomes a `CommitPlan`: the
//! wire request plus the override(s) it applies locally. Both sides of a
//! swap are applied together and rolled back together, so the grid never
//! shows a half-applied exchange. The persistence call itself runs on the
//! async compute pool and is polled each frame; exactly one can be in
//! flight.

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
use std::sync::Arc;

use placement::notifications::{NotificationEvent, NoticePriority};
use placement::optimistic::{OperationLock, OptimisticPositions, LOCK_COOLDOWN_SECS};
use placement::types::{GridCell, ItemId, ZoneId};

use sync::api::ApiHandle;
use sync::error::SyncError;
use sync::fetch::RefreshItems;
use sync::requests::PlacementRequest;

use crate::drag::{DragState, DropAction};
use crate::haptics::{HapticKind, HapticPulse};

/// Everything a commit touches: the request to send and the optimistic
/// overrides to apply now and roll back on failure.
#[derive(Debug, Clone)]
pub struct CommitPlan {
    pub zone: ZoneId,
    pub request: PlacementRequest,
    /// Overrides this commit applies, as `(item, new cell)` pairs.
    pub applies: Vec<(ItemId, GridCell)>,
}

/// Turn a finished drag into a commit plan. `Blocked` drops yield `None`.
pub fn plan_commit(state: &DragState) -> Option<CommitPlan> {
    match state.action {
        DropAction::Move(target) => Some(CommitPlan {
            zone: state.zone,
            request: PlacementRequest::move_to(state.item, state.zone, target),
            applies: vec![(state.item, target)],
        }),
        DropAction::Swap(target, other) => Some(CommitPlan {
            zone: state.zone,
            request: PlacementRequest::swap(state.item, state.zone, target, other, state.origin),
            applies: vec![(state.item, target), (other, state.origin)],
        }),
        DropAction::Blocked => None,
    }
}

pub fn apply_plan(plan: &CommitPlan, store: &mut OptimisticPositions) {
    for (item, cell) in &plan.applies {
        store.apply(*item, *cell);
    }
}

pub fn rollback_plan(plan: &CommitPlan, store: &mut OptimisticPositions) {
    for (item, _) in &plan.applies {
        store.clear(*item);
    }
}

pub struct CommitInFlight {
    task: Task<Result<(), SyncError>>,
    plan: CommitPlan,
    via_touch: bool,
}

#[derive(Resource, Default)]
pub struct PendingCommit(pub Option<CommitInFlight>);

/// Apply the plan optimistically, engage the lock, and send the request.
pub fn start_commit(
    plan: CommitPlan,
    via_touch: bool,
    store: &mut OptimisticPositions,
    lock: &mut OperationLock,
    pending: &mut PendingCommit,
    api: &ApiHandle,
) {
    debug_assert!(pending.0.is_none());
    apply_plan(&plan, store);
    lock.engage();

    let api = Arc::clone(&api.0);
    let request = plan.request.clone();
    let task = AsyncComputeTaskPool::get().spawn(async move { api.commit(&request) });
    pending.0 = Some(CommitInFlight {
        task,
        plan,
        via_touch,
    });
}

/// Poll the in-flight commit. Success keeps the optimistic state and holds
/// the lock for a cooldown until the refetched item list supersedes it;
/// failure rolls every touched override back and releases the lock at once.
pub fn poll_commit(
    mut pending: ResMut<PendingCommit>,
    mut store: ResMut<OptimisticPositions>,
    mut lock: ResMut<OperationLock>,
    mut notices: EventWriter<NotificationEvent>,
    mut refresh: EventWriter<RefreshItems>,
    mut haptics: EventWriter<HapticPulse>,
) {
    let Some(commit) = pending.0.as_mut() else {
        return;
    };
    let Some(result) = block_on(futures_lite::future::poll_once(&mut commit.task)) else {
        return;
    };
    let Some(commit) = pending.0.take() else {
        return;
    };

    match result {
        Ok(()) => {
            lock.cooldown(LOCK_COOLDOWN_SECS);
            refresh.send(RefreshItems { zone: commit.plan.zone });
            notices.send(NotificationEvent::new(
                "Placement saved",
                NoticePriority::Positive,
            ));
            if commit.via_touch {
                haptics.send(HapticPulse::new(HapticKind::Success));
            }
        }
        Err(err) => {
            rollback_plan(&commit.plan, &mut store);
            lock.release();
            notices.send(NotificationEvent::new(
                format!("Could not save placement: {err}"),
                NoticePriority::Error,
            ));
            if commit.via_touch {
                haptics.send(HapticPulse::new(HapticKind::Error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::TaskPool;
    use placement::notifications::{collect_notifications, NotificationLog};
    use placement::optimistic::LockPhase;
    use placement::types::{ItemDirectory, PlacedItem, VenueCategory};
    use sync::api::InMemoryApi;

    use crate::drag::PointerKind;

    fn directory() -> ItemDirectory {
        ItemDirectory {
            items: vec![
                PlacedItem {
                    id: ItemId(1),
                    name: "A".into(),
                    category: VenueCategory::Food,
                    zone: ZoneId::Plaza,
                    cell: GridCell::new(1, 1),
                },
                PlacedItem {
                    id: ItemId(2),
                    name: "B".into(),
                    category: VenueCategory::Retail,
                    zone: ZoneId::Plaza,
                    cell: GridCell::new(1, 3),
                },
            ],
        }
    }

    fn drag(action: DropAction) -> DragState {
        DragState {
            item: ItemId(1),
            zone: ZoneId::Plaza,
            origin: GridCell::new(1, 1),
            pointer: PointerKind::Mouse,
            pointer_pos: Vec2::ZERO,
            candidate: None,
            action,
        }
    }

    #[test]
    fn test_move_plan_touches_only_the_moved_item() {
        let dir = directory();
        let mut store = OptimisticPositions::default();
        let plan = plan_commit(&drag(DropAction::Move(GridCell::new(1, 2)))).unwrap();
        assert!(!plan.request.is_swap());
        apply_plan(&plan, &mut store);
        assert_eq!(
            dir.resolved_cell(ItemId(1), &store),
            Some(GridCell::new(1, 2))
        );
        assert_eq!(
            dir.resolved_cell(ItemId(2), &store),
            Some(GridCell::new(1, 3))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_swap_plan_moves_both_sides_together() {
        let dir = directory();
        let mut store = OptimisticPositions::default();
        let plan = plan_commit(&drag(DropAction::Swap(GridCell::new(1, 3), ItemId(2)))).unwrap();
        assert!(plan.request.is_swap());
        apply_plan(&plan, &mut store);
        assert_eq!(
            dir.resolved_cell(ItemId(1), &store),
            Some(GridCell::new(1, 3))
        );
        assert_eq!(
            dir.resolved_cell(ItemId(2), &store),
            Some(GridCell::new(1, 1))
        );
    }

    #[test]
    fn test_blocked_drop_has_no_plan() {
        assert!(plan_commit(&drag(DropAction::Blocked)).is_none());
    }

    #[test]
    fn test_rollback_restores_pre_commit_state() {
        let dir = directory();
        let mut store = OptimisticPositions::default();
        let plan = plan_commit(&drag(DropAction::Swap(GridCell::new(1, 3), ItemId(2)))).unwrap();
        apply_plan(&plan, &mut store);
        rollback_plan(&plan, &mut store);
        assert!(store.is_empty());
        assert_eq!(
            dir.resolved_cell(ItemId(1), &store),
            Some(GridCell::new(1, 1))
        );
        assert_eq!(
            dir.resolved_cell(ItemId(2), &store),
            Some(GridCell::new(1, 3))
        );
    }

    /// Full failure path: the backend rejects the move; afterwards the item
    /// resolves to its original cell, the lock is open, and exactly one
    /// error notice was raised.
    #[test]
    fn test_failed_move_rolls_back_and_notifies_once() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);

        let backend = Arc::new(InMemoryApi::seeded());
        backend.fail_next_commit();
        let api = ApiHandle(backend);

        let mut app = App::new();
        app.add_event::<NotificationEvent>()
            .add_event::<RefreshItems>()
            .add_event::<HapticPulse>()
            .init_resource::<NotificationLog>()
            .init_resource::<PendingCommit>()
            .init_resource::<OptimisticPositions>()
            .init_resource::<OperationLock>()
            .add_systems(Update, (poll_commit, collect_notifications).chain());

        let plan = plan_commit(&drag(DropAction::Move(GridCell::new(1, 2)))).unwrap();
        {
            let world = app.world_mut();
            world.resource_scope(|world, mut store: Mut<OptimisticPositions>| {
                world.resource_scope(|world, mut lock: Mut<OperationLock>| {
                    let mut pending = world.resource_mut::<PendingCommit>();
                    start_commit(plan, false, &mut store, &mut lock, &mut pending, &api);
                });
            });
        }
        assert!(app.world().resource::<OperationLock>().is_locked());

        for _ in 0..200 {
            app.update();
            if app.world().resource::<PendingCommit>().0.is_none() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let dir = directory();
        let world = app.world();
        assert!(world.resource::<PendingCommit>().0.is_none(), "commit never resolved");
        let store = world.resource::<OptimisticPositions>();
        assert!(store.is_empty());
        assert_eq!(
            dir.resolved_cell(ItemId(1), store),
            Some(GridCell::new(1, 1))
        );
        assert_eq!(world.resource::<OperationLock>().phase(), LockPhase::Open);
        let log = world.resource::<NotificationLog>();
        assert_eq!(log.active.len(), 1);
        assert_eq!(log.active[0].priority, NoticePriority::Error);
    }

    /// Success path: overrides stay until the refetch, lock moves to
    /// cooldown, and a refresh for the zone is requested.
    #[test]
    fn test_successful_commit_enters_cooldown_and_requests_refresh() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);

        let api = ApiHandle(Arc::new(InMemoryApi::seeded()));

        let mut app = App::new();
        app.add_event::<NotificationEvent>()
            .add_event::<RefreshItems>()
            .add_event::<HapticPulse>()
            .init_resource::<NotificationLog>()
            .init_resource::<PendingCommit>()
            .init_resource::<OptimisticPositions>()
            .init_resource::<OperationLock>()
            .add_systems(Update, (poll_commit, collect_notifications).chain());

        let plan = plan_commit(&drag(DropAction::Move(GridCell::new(1, 2)))).unwrap();
        {
            let world = app.world_mut();
            world.resource_scope(|world, mut store: Mut<OptimisticPositions>| {
                world.resource_scope(|world, mut lock: Mut<OperationLock>| {
                    let mut pending = world.resource_mut::<PendingCommit>();
                    start_commit(plan, false, &mut store, &mut lock, &mut pending, &api);
                });
            });
        }

        for _ in 0..200 {
            app.update();
            if app.world().resource::<PendingCommit>().0.is_none() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let world = app.world();
        assert!(world.resource::<PendingCommit>().0.is_none(), "commit never resolved");
        let store = world.resource::<OptimisticPositions>();
        assert_eq!(store.override_for(ItemId(1)), Some(GridCell::new(1, 2)));
        assert!(matches!(
            world.resource::<OperationLock>().phase(),
            LockPhase::Cooldown(_)
        ));
    }
}
