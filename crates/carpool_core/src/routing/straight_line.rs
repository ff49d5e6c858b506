//! Straight-line travel-time estimates (fallback when no road router is available).

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::error::RoutingError;
use crate::geo::Coordinate;

use super::{RouteProvider, TransportMode};

/// Average city driving speed.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Average walking speed.
const WALKING_SPEED_KMH: f64 = 5.0;

pub(crate) fn default_speed_kmh() -> f64 {
    DEFAULT_SPEED_KMH
}

/// Estimates travel time from great-circle distance and an assumed speed.
///
/// `circuity` scales the straight-line distance to approximate the road
/// network (1.0 = as the crow flies).
#[derive(Debug, Clone, PartialEq)]
pub struct StraightLineRouteProvider {
    pub speed_kmh: f64,
    pub circuity: f64,
}

impl Default for StraightLineRouteProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_KMH)
    }
}

impl StraightLineRouteProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            circuity: 1.0,
        }
    }

    pub fn with_circuity(mut self, circuity: f64) -> Self {
        self.circuity = circuity;
        self
    }

    /// Synchronous estimate in seconds.
    pub fn estimate_secs(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> Result<f64, RoutingError> {
        let speed_kmh = match mode {
            TransportMode::Automobile => self.speed_kmh,
            TransportMode::Walking => WALKING_SPEED_KMH,
        };
        if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
            return Err(RoutingError::InvalidResponse(format!(
                "speed must be positive, got {speed_kmh} km/h"
            )));
        }
        let distance_km = from.distance_m(&to) * self.circuity / 1_000.0;
        Ok(distance_km / speed_kmh * 3_600.0)
    }
}

impl RouteProvider for StraightLineRouteProvider {
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>> {
        future::ready(self.estimate_secs(from, to, mode)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_km_at_forty_kmh_is_fifteen_minutes() {
        let from = Coordinate::new(22.0, 113.5).expect("valid");
        // 10 km north along a meridian.
        let to = Coordinate::new(22.0 + 10_000.0 / 111_195.0, 113.5).expect("valid");
        let secs = StraightLineRouteProvider::default()
            .estimate_secs(from, to, TransportMode::Automobile)
            .expect("estimate");
        assert!((secs - 900.0).abs() < 2.0, "got {secs}");
    }

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(22.2, 113.5).expect("valid");
        let secs = StraightLineRouteProvider::default()
            .estimate_secs(p, p, TransportMode::Automobile)
            .expect("estimate");
        assert_eq!(secs, 0.0);
    }

    #[test]
    fn non_positive_speed_is_an_error() {
        let p = Coordinate::new(22.2, 113.5).expect("valid");
        assert!(StraightLineRouteProvider::new(0.0)
            .estimate_secs(p, p, TransportMode::Automobile)
            .is_err());
    }

    #[tokio::test]
    async fn walking_is_slower_than_driving() {
        let provider = StraightLineRouteProvider::default().with_circuity(1.3);
        let from = Coordinate::new(22.2106, 113.5466).expect("valid");
        let to = Coordinate::new(22.2166, 113.5495).expect("valid");
        let drive = provider
            .travel_time(from, to, TransportMode::Automobile)
            .await
            .expect("drive");
        let walk = provider
            .travel_time(from, to, TransportMode::Walking)
            .await
            .expect("walk");
        assert!(walk > drive);
    }
}
