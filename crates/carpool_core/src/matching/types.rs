use crate::model::Trip;

/// Which hard cutoff forced a score to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCutoff {
    /// Departure times differ by more than the window.
    TimeWindow,
    /// Pickup or dropoff is farther than the leg radius from the trip's ends.
    Distance,
}

/// Per-factor view of a score. Factor scores are in [0, 1] before weighting.
///
/// Evaluation stops at the first cutoff, so factors after it stay at zero and
/// the leg distances are NaN when the time window already failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub time_score: f64,
    pub distance_score: f64,
    pub seat_score: f64,
    pub start_distance_m: f64,
    pub end_distance_m: f64,
    pub time_diff_secs: f64,
    pub total: f64,
    pub cutoff: Option<ScoreCutoff>,
}

/// A scored trip from a candidate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate<'a> {
    pub trip: &'a Trip,
    pub score: f64,
}
