use crate::config::MatchingConfig;
use crate::model::{MatchRequest, Trip};

use super::scorer::TripScorer;
use super::types::{ScoreBreakdown, ScoreCutoff};

/// Weighted time/distance/seat scorer.
///
/// With the default configuration:
///
/// - time (0.3): `1 - diff/1200s`, zero total beyond 20 minutes
/// - distance (0.5): mean of `1 - d/1000m` over pickup and dropoff legs,
///   zero total if either leg exceeds 1 km
/// - seats (0.2): 1 when a seat is free, else 0
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Full per-factor evaluation. The hard cutoffs short-circuit in order:
    /// time window first, then distance.
    pub fn score_breakdown(&self, request: &MatchRequest, candidate: &Trip) -> ScoreBreakdown {
        let config = &self.config;
        // Gaps too large for i64 nanoseconds land past any window.
        let time_diff_secs = (request.time - candidate.start_time)
            .num_nanoseconds()
            .map_or(f64::INFINITY, |ns| ns.unsigned_abs() as f64 / 1e9);

        let mut breakdown = ScoreBreakdown {
            time_score: 0.0,
            distance_score: 0.0,
            seat_score: 0.0,
            start_distance_m: f64::NAN,
            end_distance_m: f64::NAN,
            time_diff_secs,
            total: 0.0,
            cutoff: None,
        };

        if time_diff_secs > config.max_time_diff_secs {
            breakdown.cutoff = Some(ScoreCutoff::TimeWindow);
            return breakdown;
        }
        breakdown.time_score = unit_falloff(time_diff_secs, config.max_time_diff_secs);

        let start_distance_m = request.from.distance_to(&candidate.start_location);
        let end_distance_m = request.to.distance_to(&candidate.end_location);
        breakdown.start_distance_m = start_distance_m;
        breakdown.end_distance_m = end_distance_m;

        if start_distance_m > config.max_leg_distance_m || end_distance_m > config.max_leg_distance_m
        {
            breakdown.cutoff = Some(ScoreCutoff::Distance);
            return breakdown;
        }
        breakdown.distance_score = (unit_falloff(start_distance_m, config.max_leg_distance_m)
            + unit_falloff(end_distance_m, config.max_leg_distance_m))
            / 2.0;

        breakdown.seat_score = if candidate.available_seats > 0 { 1.0 } else { 0.0 };

        breakdown.total = (breakdown.time_score * config.time_weight
            + breakdown.distance_score * config.distance_weight
            + breakdown.seat_score * config.seat_weight)
            .clamp(0.0, 1.0);
        breakdown
    }
}

impl TripScorer for MatchingEngine {
    fn score(&self, request: &MatchRequest, candidate: &Trip) -> f64 {
        self.score_breakdown(request, candidate).total
    }
}

/// `1 - value/limit`, floored at zero.
fn unit_falloff(value: f64, limit: f64) -> f64 {
    (1.0 - value / limit).max(0.0)
}
