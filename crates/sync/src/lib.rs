//! Backend synchronization: the `PlacementApi` seam, typed errors, wire
//! payloads, and the item-list fetch bridge. The commit path lives in the
//! `interaction` crate, which drives this API from the drag controller.

use bevy::prelude::*;

pub mod api;
pub mod error;
pub mod fetch;
pub mod requests;

pub struct SyncPlugin;

impl Plugin for SyncPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(api::ApiHandle(api::api_from_env()))
            .init_resource::<fetch::PendingFetch>()
            .add_event::<fetch::RefreshItems>()
            .add_systems(
                Update,
                (
                    fetch::refetch_on_zone_change,
                    fetch::spawn_fetches,
                    fetch::poll_fetches,
                )
                    .chain(),
            );
    }
}
