use std::cmp::Ordering;

use crate::model::{MatchRequest, Trip};

use super::types::MatchCandidate;

/// Trait for scoring how well a driver trip serves a rider request.
///
/// Scoring is a pure function of the two inputs: no I/O, no shared mutable
/// state. Callers score a candidate set and filter or rank the results.
///
/// # Examples
///
/// ```rust,no_run
/// use carpool_core::matching::{MatchingEngine, TripScorer};
/// use carpool_core::test_helpers::{campus_request, campus_trip, test_time};
///
/// let engine = MatchingEngine::default();
/// let trips = vec![campus_trip("t1"), campus_trip("t2")];
/// let ranked = engine.rank(&campus_request(test_time()), &trips, 0.5);
/// ```
pub trait TripScorer: Send + Sync {
    /// Score `candidate` for `request`.
    ///
    /// # Returns
    ///
    /// A value in [0, 1]. Zero means "no match"; it is a valid result, not a
    /// failure. The arguments play different roles and are not interchangeable.
    fn score(&self, request: &MatchRequest, candidate: &Trip) -> f64;

    /// Score every candidate and return those at or above `threshold`.
    ///
    /// # Arguments
    ///
    /// * `request` - The rider's desired trip
    /// * `candidates` - Trips to score
    /// * `threshold` - Minimum score to keep; zero scores are always dropped
    ///
    /// # Returns
    ///
    /// Candidates in descending score order. Equal scores are ordered by trip
    /// id so the ranking is deterministic.
    fn rank<'a>(
        &self,
        request: &MatchRequest,
        candidates: &'a [Trip],
        threshold: f64,
    ) -> Vec<MatchCandidate<'a>> {
        let mut ranked: Vec<MatchCandidate<'a>> = candidates
            .iter()
            .filter_map(|trip| {
                let score = self.score(request, trip);
                (score > 0.0 && score >= threshold).then_some(MatchCandidate { trip, score })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.trip.id.cmp(&b.trip.id))
        });
        ranked
    }
}
