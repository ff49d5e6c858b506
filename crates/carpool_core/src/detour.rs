//! Route detour evaluation: does inserting a rider's pickup and dropoff into
//! a driver's route add an acceptable amount of travel time?
//!
//! The new stops go at a fixed position: pickup right after the route start,
//! dropoff right after the pickup, followed by the rest of the original route.
//! There is no search over insertion positions.
//!
//! Each leg is an independent routing-provider call. Legs run concurrently and
//! their estimates are summed, so completion order does not matter. A leg
//! whose estimate fails or times out contributes [`LEG_FALLBACK_SECS`]; one
//! bad leg degrades the estimate instead of aborting the check.
//!
//! Dropping the future returned by [`DetourEvaluator::check_detour`] cancels
//! all outstanding leg requests and yields no decision.

use std::sync::Arc;

use futures_util::future;

use crate::config::DetourConfig;
use crate::error::{InputError, RoutingError};
use crate::geo::{Coordinate, LocationPoint};
use crate::routing::RouteProvider;

/// Travel time credited to a leg whose estimate could not be obtained.
pub const LEG_FALLBACK_SECS: f64 = 0.0;

/// Summed travel time over a route.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteEstimate {
    pub total_secs: f64,
    pub legs: usize,
    /// Legs that fell back to [`LEG_FALLBACK_SECS`].
    pub failed_legs: usize,
}

/// Outcome of one detour check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetourDecision {
    pub accepted: bool,
    pub original_time_secs: f64,
    pub new_time_secs: f64,
    pub extra_time_secs: f64,
    /// Failed legs across both the original and the new route.
    pub failed_legs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LegOutcome {
    Estimated(f64),
    Fallback,
}

impl LegOutcome {
    fn secs(self) -> f64 {
        match self {
            LegOutcome::Estimated(secs) => secs,
            LegOutcome::Fallback => LEG_FALLBACK_SECS,
        }
    }
}

#[derive(Clone)]
pub struct DetourEvaluator {
    provider: Arc<dyn RouteProvider>,
    config: DetourConfig,
}

impl DetourEvaluator {
    pub fn new(provider: Arc<dyn RouteProvider>, config: DetourConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &DetourConfig {
        &self.config
    }

    /// Evaluate inserting `new_pickup` and `new_dropoff` into `current_route`.
    ///
    /// An empty route is rejected as input error, since there is no start to
    /// insert after. A single-point route is valid and has zero original time.
    pub async fn check_detour(
        &self,
        current_route: &[LocationPoint],
        new_pickup: &LocationPoint,
        new_dropoff: &LocationPoint,
    ) -> Result<DetourDecision, InputError> {
        if current_route.is_empty() {
            return Err(InputError::EmptyRoute);
        }

        let original: Vec<Coordinate> = current_route.iter().map(LocationPoint::coordinate).collect();
        let updated = insert_stops(&original, new_pickup.coordinate(), new_dropoff.coordinate());

        let (original_estimate, new_estimate) =
            future::join(self.route_time(&original), self.route_time(&updated)).await;

        let extra_time_secs = new_estimate.total_secs - original_estimate.total_secs;
        let accepted = self.within_limits(extra_time_secs, original_estimate.total_secs);

        let decision = DetourDecision {
            accepted,
            original_time_secs: original_estimate.total_secs,
            new_time_secs: new_estimate.total_secs,
            extra_time_secs,
            failed_legs: original_estimate.failed_legs + new_estimate.failed_legs,
        };
        tracing::debug!(
            accepted,
            original_secs = decision.original_time_secs,
            new_secs = decision.new_time_secs,
            extra_secs = decision.extra_time_secs,
            failed_legs = decision.failed_legs,
            "detour evaluated"
        );
        Ok(decision)
    }

    /// [`Self::check_detour`] reduced to the accept flag.
    pub async fn accepts(
        &self,
        current_route: &[LocationPoint],
        new_pickup: &LocationPoint,
        new_dropoff: &LocationPoint,
    ) -> Result<bool, InputError> {
        self.check_detour(current_route, new_pickup, new_dropoff)
            .await
            .map(|decision| decision.accepted)
    }

    /// Sum of leg estimates over consecutive points. Fewer than two points
    /// means no legs and zero time.
    pub async fn route_time(&self, points: &[Coordinate]) -> RouteEstimate {
        if points.len() < 2 {
            return RouteEstimate::default();
        }

        let outcomes = future::join_all(
            points
                .windows(2)
                .map(|pair| self.leg_time(pair[0], pair[1])),
        )
        .await;

        outcomes
            .into_iter()
            .fold(RouteEstimate::default(), |mut estimate, outcome| {
                estimate.legs += 1;
                estimate.total_secs += outcome.secs();
                if outcome == LegOutcome::Fallback {
                    estimate.failed_legs += 1;
                }
                estimate
            })
    }

    async fn leg_time(&self, from: Coordinate, to: Coordinate) -> LegOutcome {
        let request = self
            .provider
            .travel_time(from, to, self.config.transport_mode);
        let estimate = tokio::time::timeout(self.config.leg_timeout(), request)
            .await
            .unwrap_or(Err(RoutingError::Timeout));

        match estimate {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => {
                tracing::debug!(%from, %to, secs, "leg estimated");
                LegOutcome::Estimated(secs)
            }
            Ok(secs) => {
                tracing::warn!(%from, %to, secs, "unusable leg estimate, counting leg as zero");
                LegOutcome::Fallback
            }
            Err(error) => {
                tracing::warn!(
                    %from,
                    %to,
                    %error,
                    timeout_ms = self.config.leg_timeout_ms,
                    "leg estimate failed, counting leg as zero"
                );
                LegOutcome::Fallback
            }
        }
    }

    fn within_limits(&self, extra_time_secs: f64, original_time_secs: f64) -> bool {
        if extra_time_secs > self.config.max_extra_secs {
            return false;
        }
        match self.config.max_extra_ratio {
            Some(ratio) if original_time_secs > 0.0 => extra_time_secs <= ratio * original_time_secs,
            _ => true,
        }
    }
}

/// Copy of `route` with `pickup` at index 1 and `dropoff` at index 2.
///
/// `route` must be non-empty.
fn insert_stops<T: Clone>(route: &[T], pickup: T, dropoff: T) -> Vec<T> {
    let mut updated = Vec::with_capacity(route.len() + 2);
    updated.extend_from_slice(&route[..1]);
    updated.push(pickup);
    updated.push(dropoff);
    updated.extend_from_slice(&route[1..]);
    updated
}
