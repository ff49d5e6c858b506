//! Test helpers for common test setup and utilities.
//!
//! Fixtures sit on the MUST campus in Macau: trips run from the E6 dorm to
//! the border gate, and requests start and end about 100 m from those ends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::future::{self, BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::error::RoutingError;
use crate::geo::{Coordinate, LocationPoint};
use crate::model::{Gender, MatchRequest, Trip, User};
use crate::routing::{LegKey, RouteProvider, TransportMode};

/// Metres per degree of latitude (and of longitude at the equator).
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Departure time shared by the fixtures.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 4, 18, 30, 0).unwrap()
}

pub fn e6_dorm() -> LocationPoint {
    LocationPoint::new("E6 dorm", 22.2106, 113.5466).expect("E6 dorm should be a valid point")
}

pub fn border_gate() -> LocationPoint {
    LocationPoint::new("Border gate", 22.2166, 113.5495)
        .expect("border gate should be a valid point")
}

/// Shift `point` by metres north and east (flat-earth approximation, fine
/// for a few kilometres).
///
/// # Panics
///
/// Panics if the shifted point leaves the valid coordinate range.
pub fn offset_point(point: &LocationPoint, north_m: f64, east_m: f64) -> LocationPoint {
    let latitude = point.latitude() + north_m / METRES_PER_DEGREE;
    let longitude =
        point.longitude() + east_m / (METRES_PER_DEGREE * point.latitude().to_radians().cos());
    LocationPoint::new(point.name(), latitude, longitude).expect("offset point should stay valid")
}

/// An open three-seat trip from the E6 dorm to the border gate at [`test_time`].
pub fn campus_trip(id: &str) -> Trip {
    Trip::new(
        id,
        format!("driver-{id}"),
        e6_dorm(),
        border_gate(),
        test_time(),
        3,
        Decimal::new(15, 0),
    )
    .expect("campus trip should be valid")
}

/// A request starting 100 m north of the dorm and ending 100 m east of the gate.
pub fn campus_request(time: DateTime<Utc>) -> MatchRequest {
    MatchRequest::new(
        offset_point(&e6_dorm(), 100.0, 0.0),
        offset_point(&border_gate(), 0.0, 100.0),
        time,
    )
}

/// A verified student with an institutional email.
pub fn student(id: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("Student {id}"),
        student_id: format!("22{id}"),
        school_email: format!("{id}@must.edu.mo"),
        gender: Gender::Unknown,
        is_verified: true,
    }
}

/// Seeded open trips scattered within `spread_m` of `around`, departing
/// within ten minutes of `base_time`.
pub fn random_trips(
    seed: u64,
    count: usize,
    around: &LocationPoint,
    spread_m: f64,
    base_time: DateTime<Utc>,
) -> Vec<Trip> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let start = offset_point(
                around,
                rng.gen_range(-spread_m..=spread_m),
                rng.gen_range(-spread_m..=spread_m),
            );
            let end = offset_point(
                &border_gate(),
                rng.gen_range(-spread_m..=spread_m),
                rng.gen_range(-spread_m..=spread_m),
            );
            let total_seats = rng.gen_range(1..=4);
            Trip::new(
                format!("trip-{i:04}"),
                format!("driver-{i:04}"),
                start,
                end,
                base_time + Duration::seconds(rng.gen_range(-600..=600)),
                total_seats,
                Decimal::new(rng.gen_range(10..=30), 0),
            )
            .expect("random trip should be valid")
            .with_available_seats(rng.gen_range(0..=total_seats))
        })
        .collect()
}

/// What a [`ScriptedRouteProvider`] does for one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegScript {
    /// Answer with this many seconds.
    Secs(f64),
    /// Answer with [`RoutingError::NoRoute`].
    Fail,
    /// Never answer.
    Hang,
}

/// Shared count of provider calls, readable after the provider is moved.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Route provider answering from a fixed per-leg script.
///
/// Legs without a script use the default, which fails unless set with
/// [`ScriptedRouteProvider::with_default`].
#[derive(Debug, Clone)]
pub struct ScriptedRouteProvider {
    legs: HashMap<LegKey, LegScript>,
    default: LegScript,
    calls: CallCounter,
}

impl Default for ScriptedRouteProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRouteProvider {
    pub fn new() -> Self {
        Self {
            legs: HashMap::new(),
            default: LegScript::Fail,
            calls: CallCounter::default(),
        }
    }

    /// Script the directional leg `from -> to` (any transport mode).
    pub fn with_leg(mut self, from: Coordinate, to: Coordinate, script: LegScript) -> Self {
        self.legs
            .insert(LegKey::new(from, to, TransportMode::Automobile), script);
        self
    }

    /// [`Self::with_leg`] for location points.
    pub fn with_points(self, from: &LocationPoint, to: &LocationPoint, script: LegScript) -> Self {
        self.with_leg(from.coordinate(), to.coordinate(), script)
    }

    pub fn with_default(mut self, script: LegScript) -> Self {
        self.default = script;
        self
    }

    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    fn script_for(&self, from: Coordinate, to: Coordinate) -> LegScript {
        self.legs
            .get(&LegKey::new(from, to, TransportMode::Automobile))
            .copied()
            .unwrap_or(self.default)
    }
}

impl RouteProvider for ScriptedRouteProvider {
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        _mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        match self.script_for(from, to) {
            LegScript::Secs(secs) => future::ready(Ok(secs)).boxed(),
            LegScript::Fail => future::ready(Err(RoutingError::NoRoute)).boxed(),
            LegScript::Hang => future::pending::<Result<f64, RoutingError>>().boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_point_moves_by_requested_distance() {
        let origin = e6_dorm();
        let north = offset_point(&origin, 500.0, 0.0);
        let east = offset_point(&origin, 0.0, 500.0);
        assert!((origin.distance_to(&north) - 500.0).abs() < 2.0);
        assert!((origin.distance_to(&east) - 500.0).abs() < 2.0);
    }

    #[test]
    fn random_trips_are_deterministic_per_seed() {
        let a = random_trips(7, 20, &e6_dorm(), 800.0, test_time());
        let b = random_trips(7, 20, &e6_dorm(), 800.0, test_time());
        assert_eq!(a, b);
        assert!(a.iter().all(|trip| trip.validate().is_ok()));
    }

    #[tokio::test]
    async fn scripted_provider_counts_calls_and_fails_unscripted_legs() {
        let a = e6_dorm();
        let b = border_gate();
        let provider = ScriptedRouteProvider::new().with_points(&a, &b, LegScript::Secs(42.0));
        let calls = provider.call_counter();

        assert_eq!(
            provider
                .travel_time(a.coordinate(), b.coordinate(), TransportMode::Automobile)
                .await,
            Ok(42.0)
        );
        assert_eq!(
            provider
                .travel_time(b.coordinate(), a.coordinate(), TransportMode::Automobile)
                .await,
            Err(RoutingError::NoRoute)
        );
        assert_eq!(calls.get(), 2);
    }
}
