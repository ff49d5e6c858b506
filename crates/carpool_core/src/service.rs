//! End-to-end match pipeline: candidate lookup, eligibility, scoring, ranking
//! and detour confirmation.
//!
//! ```text
//! request ─► TripStore::open_trips_near ─► TripValidator::can_join
//!         ─► MatchingEngine::score / rank ─► DetourEvaluator::check_detour
//!         ─► confirmed matches (best score first)
//! ```
//!
//! Every collaborator is passed in explicitly. The pipeline reads a snapshot
//! of each trip and never writes back; seat reservation is the caller's job.

use std::sync::Arc;

use futures_util::future;

use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, ServiceConfig};
use crate::detour::{DetourDecision, DetourEvaluator};
use crate::error::MatchError;
use crate::matching::{MatchingEngine, TripScorer};
use crate::model::{MatchRequest, Trip, User};
use crate::routing::RouteProvider;
use crate::store::{TripStore, UserStore};
use crate::validator::{JoinDecision, TripValidator};

/// A trip that passed eligibility, scoring and (when enabled) the detour check.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedMatch {
    pub trip: Trip,
    pub score: f64,
    /// `None` when detour checks are disabled.
    pub detour: Option<DetourDecision>,
}

pub struct MatchService {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserStore>,
    engine: MatchingEngine,
    validator: TripValidator,
    detour: DetourEvaluator,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl MatchService {
    pub fn new(
        trips: Arc<dyn TripStore>,
        users: Arc<dyn UserStore>,
        provider: Arc<dyn RouteProvider>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            trips,
            users,
            engine: MatchingEngine::new(config.matching.clone()),
            validator: TripValidator::new(config.validator.clone()),
            detour: DetourEvaluator::new(provider, config.detour.clone()),
            clock: Arc::new(SystemClock),
            config: config.service.clone(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn load_rider(&self, rider_id: &str) -> Result<User, MatchError> {
        let rider = self
            .users
            .user(rider_id)?
            .ok_or_else(|| MatchError::UnknownUser(rider_id.to_string()))?;
        self.validator.check_user(&rider)?;
        Ok(rider)
    }

    /// Eligibility of one rider for one stored trip, at the clock's "now".
    pub fn check_join(
        &self,
        rider_id: &str,
        trip_id: &str,
        request: &MatchRequest,
    ) -> Result<JoinDecision, MatchError> {
        let rider = self.load_rider(rider_id)?;
        let trip = self
            .trips
            .trip(trip_id)?
            .ok_or_else(|| MatchError::UnknownTrip(trip_id.to_string()))?;
        Ok(self
            .validator
            .can_join(request, &trip, &rider, self.clock.now()))
    }

    /// Find trips the rider can join, best score first.
    pub async fn find_matches(
        &self,
        rider_id: &str,
        request: &MatchRequest,
    ) -> Result<Vec<ConfirmedMatch>, MatchError> {
        request.validate()?;
        let rider = self.load_rider(rider_id)?;
        let now = self.clock.now();
        let matching = self.engine.config();

        let nearby = self
            .trips
            .open_trips_near(&request.from, matching.max_leg_distance_m)?;
        let nearby_count = nearby.len();

        let eligible: Vec<Trip> = nearby
            .into_iter()
            .filter(|trip| {
                let decision = self.validator.can_join(request, trip, &rider, now);
                if !decision.is_allowed() {
                    tracing::debug!(trip_id = %trip.id, reason = decision.reason(), "skipping ineligible trip");
                }
                decision.is_allowed()
            })
            .collect();

        let ranked = self.engine.rank(request, &eligible, matching.min_score);
        let ranked_count = ranked.len();

        let confirmed = if self.config.check_detours {
            let shortlist = &ranked[..ranked.len().min(self.config.max_detour_checks)];
            let checks = shortlist.iter().map(|candidate| async move {
                let route = candidate.trip.route();
                self.detour
                    .check_detour(&route, &request.from, &request.to)
                    .await
                    .map(|decision| (candidate, decision))
            });

            let mut confirmed = Vec::with_capacity(shortlist.len());
            for result in future::join_all(checks).await {
                let (candidate, decision) = result?;
                if decision.accepted {
                    confirmed.push(ConfirmedMatch {
                        trip: candidate.trip.clone(),
                        score: candidate.score,
                        detour: Some(decision),
                    });
                } else {
                    tracing::debug!(
                        trip_id = %candidate.trip.id,
                        extra_secs = decision.extra_time_secs,
                        "detour too long"
                    );
                }
            }
            confirmed
        } else {
            ranked
                .iter()
                .map(|candidate| ConfirmedMatch {
                    trip: candidate.trip.clone(),
                    score: candidate.score,
                    detour: None,
                })
                .collect()
        };

        tracing::info!(
            rider_id,
            nearby = nearby_count,
            eligible = eligible.len(),
            ranked = ranked_count,
            confirmed = confirmed.len(),
            "match search finished"
        );
        Ok(confirmed)
    }
}
