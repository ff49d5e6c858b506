//! Read-only store collaborators for trips and users, plus in-memory
//! implementations.
//!
//! The core never writes back: joining a trip and decrementing seats happen
//! in the trip-management service that owns these records.
//!
//! [`InMemoryTripStore`] indexes trips by the H3 cell of their start point so
//! proximity queries only scan a grid disk around the rider, then confirm each
//! hit with an exact haversine distance.

use std::collections::HashMap;

use h3o::{CellIndex, LatLng, Resolution};

use crate::error::{InputError, StoreError};
use crate::geo::LocationPoint;
use crate::model::{Trip, User};

/// Supplies trip snapshots.
pub trait TripStore: Send + Sync {
    /// Open trips whose start location is within `radius_m` of `point`.
    fn open_trips_near(&self, point: &LocationPoint, radius_m: f64)
        -> Result<Vec<Trip>, StoreError>;

    fn trip(&self, id: &str) -> Result<Option<Trip>, StoreError>;
}

/// Supplies rider accounts.
pub trait UserStore: Send + Sync {
    fn user(&self, id: &str) -> Result<Option<User>, StoreError>;
}

/// Index resolution (~0.7 km² cells).
const INDEX_RESOLUTION: Resolution = Resolution::Eight;

/// Conservative bounds for resolution-8 cells: the largest distance from a
/// cell centre to its boundary, and the smallest centre-to-centre distance
/// covered by one step of grid distance.
const MAX_CELL_RADIUS_M: f64 = 750.0;
const MIN_STEP_M: f64 = 400.0;

/// Grid-disk size guaranteed to contain every cell whose points may lie
/// within `radius_m` of a point in the origin cell.
fn search_ring(radius_m: f64) -> u32 {
    let reach = radius_m.max(0.0) + 2.0 * MAX_CELL_RADIUS_M;
    (reach / MIN_STEP_M).ceil() as u32
}

fn cell_of(point: &LocationPoint) -> Result<CellIndex, InputError> {
    LatLng::new(point.latitude(), point.longitude())
        .map(|ll| ll.to_cell(INDEX_RESOLUTION))
        .map_err(|_| InputError::InvalidCoordinate {
            latitude: point.latitude(),
            longitude: point.longitude(),
        })
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTripStore {
    trips: HashMap<String, Trip>,
    by_cell: HashMap<CellIndex, Vec<String>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_trips(trips: impl IntoIterator<Item = Trip>) -> Result<Self, InputError> {
        let mut store = Self::new();
        for trip in trips {
            store.insert(trip)?;
        }
        Ok(store)
    }

    /// Insert or replace a trip after checking its invariants.
    pub fn insert(&mut self, trip: Trip) -> Result<(), InputError> {
        trip.validate()?;
        let cell = cell_of(&trip.start_location)?;
        self.remove(&trip.id);
        self.by_cell.entry(cell).or_default().push(trip.id.clone());
        self.trips.insert(trip.id.clone(), trip);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Trip> {
        let trip = self.trips.remove(id)?;
        if let Ok(cell) = cell_of(&trip.start_location) {
            if let Some(ids) = self.by_cell.get_mut(&cell) {
                ids.retain(|existing| existing != id);
                if ids.is_empty() {
                    self.by_cell.remove(&cell);
                }
            }
        }
        Some(trip)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

impl TripStore for InMemoryTripStore {
    fn open_trips_near(
        &self,
        point: &LocationPoint,
        radius_m: f64,
    ) -> Result<Vec<Trip>, StoreError> {
        let origin = cell_of(point)?;
        let mut found: Vec<Trip> = origin
            .grid_disk::<Vec<_>>(search_ring(radius_m))
            .into_iter()
            .filter_map(|cell| self.by_cell.get(&cell))
            .flatten()
            .filter_map(|id| self.trips.get(id))
            .filter(|trip| trip.is_open() && point.distance_to(&trip.start_location) <= radius_m)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    fn trip(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips.get(id).cloned())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: HashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    pub fn insert(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }
}

impl UserStore for InMemoryUserStore {
    fn user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).cloned())
    }
}
