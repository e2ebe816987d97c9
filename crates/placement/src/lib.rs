//! Domain core of the venue map: zone grid topologies, coordinate
//! transforms, occupancy lookup, optimistic position state, and the
//! notification sink. Owns no input handling and no networking.

use bevy::prelude::*;

pub mod geometry;
pub mod notifications;
pub mod occupancy;
pub mod optimistic;
pub mod types;
pub mod zones;


pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<types::ItemDirectory>()
            .init_resource::<types::ActiveZone>()
            .init_resource::<optimistic::OptimisticPositions>()
            .init_resource::<optimistic::OperationLock>()
            .init_resource::<notifications::NotificationLog>()
            .add_event::<notifications::NotificationEvent>()
            .add_systems(
                Update,
                (
                    optimistic::tick_operation_lock,
                    notifications::collect_notifications,
                    notifications::expire_notices,
                ),
            );
    }
}
