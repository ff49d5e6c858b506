//! Compatibility scoring of ride requests against driver trips.

pub mod engine;
pub mod scorer;
pub mod types;

pub use engine::MatchingEngine;
pub use scorer::TripScorer;
pub use types::{MatchCandidate, ScoreBreakdown, ScoreCutoff};
