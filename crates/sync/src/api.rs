//! Backend seam.
//!
//! `PlacementApi` is the whole surface the engine needs from the server: one
//! item-list fetch and one move/swap commit. The HTTP implementation speaks
//! JSON with session-cookie auth; the in-memory implementation backs the
//! offline demo and the tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use placement::types::{GridCell, PlacedItem, ItemId, VenueCategory, ZoneId};
use placement::zones::zone_config;

use crate::error::SyncError;
use crate::requests::PlacementRequest;

/// Hardening against a stalled backend: a commit that exceeds this resolves
/// to the failure path instead of holding the lock forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub trait PlacementApi: Send + Sync + 'static {
    fn fetch_items(&self, zone: ZoneId) -> Result<Vec<PlacedItem>, SyncError>;
    fn commit(&self, request: &PlacementRequest) -> Result<(), SyncError>;
}

/// Shared handle to the active backend, cloned into async tasks.
#[derive(Resource, Clone)]
pub struct ApiHandle(pub Arc<dyn PlacementApi>);

/// Pick the backend from the environment: `VENUEMAP_API_URL` (plus an
/// optional `VENUEMAP_SESSION` cookie) selects HTTP, otherwise the in-memory
/// demo backend is used.
pub fn api_from_env() -> Arc<dyn PlacementApi> {
    match std::env::var("VENUEMAP_API_URL") {
        Ok(base) => {
            let session = std::env::var("VENUEMAP_SESSION").unwrap_or_default();
            match HttpPlacementApi::new(base.clone(), session) {
                Ok(api) => {
                    info!("placement backend: {base}");
                    Arc::new(api)
                }
                Err(err) => {
                    warn!("could not build HTTP backend ({err}); using in-memory backend");
                    Arc::new(InMemoryApi::seeded())
                }
            }
        }
        Err(_) => {
            info!("VENUEMAP_API_URL not set; using in-memory backend");
            Arc::new(InMemoryApi::seeded())
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP backend
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ApiFailure {
    #[serde(default)]
    message: String,
}

pub struct HttpPlacementApi {
    base: String,
    cookie: String,
    client: reqwest::blocking::Client,
}

impl HttpPlacementApi {
    pub fn new(base: String, session: String) -> Result<Self, SyncError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            cookie: format!("session={session}"),
            client,
        })
    }
}

impl PlacementApi for HttpPlacementApi {
    fn fetch_items(&self, zone: ZoneId) -> Result<Vec<PlacedItem>, SyncError> {
        let url = format!("{}/api/zones/{}/placements", self.base, zone.slug());
        let response = self
            .client
            .get(url)
            .header(reqwest::header::COOKIE, &self.cookie)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Rejected {
                status: status.as_u16(),
                message: String::new(),
            });
        }
        Ok(response.json()?)
    }

    fn commit(&self, request: &PlacementRequest) -> Result<(), SyncError> {
        let url = format!("{}/api/placements", self.base);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::COOKIE, &self.cookie)
            .json(request)
            .send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response
            .json::<ApiFailure>()
            .map(|f| f.message)
            .unwrap_or_default();
        Err(SyncError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory backend (offline demo + tests)
// ---------------------------------------------------------------------------

pub struct InMemoryApi {
    items: Mutex<Vec<PlacedItem>>,
    fail_next_commit: AtomicBool,
}

impl InMemoryApi {
    pub fn new(items: Vec<PlacedItem>) -> Self {
        Self {
            items: Mutex::new(items),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    pub fn seeded() -> Self {
        let seed = |id: u64, name: &str, category, zone, row, col| PlacedItem {
            id: ItemId(id),
            name: name.to_string(),
            category,
            zone,
            cell: GridCell::new(row, col),
        };
        Self::new(vec![
            seed(1, "Noodle Bar", VenueCategory::Food, ZoneId::Plaza, 1, 1),
            seed(2, "Print Shop", VenueCategory::Service, ZoneId::Plaza, 1, 3),
            seed(3, "Arcade Corner", VenueCategory::Games, ZoneId::Plaza, 2, 2),
            seed(4, "Vintage Records", VenueCategory::Retail, ZoneId::Plaza, 2, 5),
            seed(5, "Oyster Shack", VenueCategory::Food, ZoneId::Harborwalk, 1, 2),
            seed(6, "Kite Store", VenueCategory::Retail, ZoneId::Harborwalk, 2, 3),
            seed(7, "Tide Museum", VenueCategory::Service, ZoneId::Harborwalk, 3, 4),
            seed(8, "Pier Grill", VenueCategory::Food, ZoneId::Harborwalk, 4, 1),
        ])
    }

    /// Make the next commit fail, for exercising the rollback path.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

impl PlacementApi for InMemoryApi {
    fn fetch_items(&self, zone: ZoneId) -> Result<Vec<PlacedItem>, SyncError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.iter().filter(|i| i.zone == zone).cloned().collect())
    }

    fn commit(&self, request: &PlacementRequest) -> Result<(), SyncError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(SyncError::Rejected {
                status: 503,
                message: "backend unavailable".into(),
            });
        }

        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);

        if !zone_config(request.zone).contains(request.target_cell) {
            return Err(SyncError::Rejected {
                status: 422,
                message: "target cell is not valid in this zone".into(),
            });
        }

        let occupant = items
            .iter()
            .find(|i| {
                i.zone == request.zone
                    && i.cell == request.target_cell
                    && i.id != request.item_id
            })
            .map(|i| i.id);
        let source_cell = items
            .iter()
            .find(|i| i.id == request.item_id)
            .map(|i| i.cell)
            .ok_or(SyncError::Rejected {
                status: 404,
                message: "unknown item".into(),
            })?;

        match (request.conflicting_item_id, occupant) {
            (None, Some(_)) => Err(SyncError::Rejected {
                status: 409,
                message: "cell already occupied".into(),
            }),
            (Some(claimed), occupant) if occupant != Some(claimed) => Err(SyncError::Rejected {
                status: 409,
                message: "placement changed, refresh and retry".into(),
            }),
            (conflicting, _) => {
                // Move, or both sides of a swap, applied together.
                for item in items.iter_mut() {
                    if item.id == request.item_id {
                        item.cell = request.target_cell;
                    } else if Some(item.id) == conflicting {
                        item.cell = request
                            .conflicting_item_target_cell
                            .unwrap_or(source_cell);
                    }
                }
                Ok(())
            }
        }
    }
}
