//! Hard eligibility rules for a rider joining a trip.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the trip must be open
//! 2. at least one seat must be free
//! 3. (only when enabled) the rider must satisfy the trip's gender preference
//! 4. the trip must not have started yet
//!
//! A failed check is an ordinary outcome, reported as a [`JoinDecision`].

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::config::ValidatorConfig;
use crate::error::InputError;
use crate::model::{MatchRequest, Trip, User};

pub const JOIN_ALLOWED_REASON: &str = "can join";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinRejection {
    TripClosed,
    SeatsFull,
    GenderMismatch,
    AlreadyStarted,
}

impl JoinRejection {
    pub fn reason(self) -> &'static str {
        match self {
            JoinRejection::TripClosed => "trip closed or finished",
            JoinRejection::SeatsFull => "seats full",
            JoinRejection::GenderMismatch => "driver restricts gender",
            JoinRejection::AlreadyStarted => "trip already started",
        }
    }
}

impl Display for JoinRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    Allowed,
    Rejected(JoinRejection),
}

impl JoinDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, JoinDecision::Allowed)
    }

    pub fn rejection(self) -> Option<JoinRejection> {
        match self {
            JoinDecision::Allowed => None,
            JoinDecision::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            JoinDecision::Allowed => JOIN_ALLOWED_REASON,
            JoinDecision::Rejected(rejection) => rejection.reason(),
        }
    }

    /// The decision as an `(allowed, reason)` pair.
    pub fn as_tuple(self) -> (bool, &'static str) {
        (self.is_allowed(), self.reason())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TripValidator {
    config: ValidatorConfig,
}

impl TripValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Decide whether `user` may join `trip` at instant `now`.
    ///
    /// The request is accepted for interface symmetry with the matcher; no
    /// current rule reads it.
    pub fn can_join(
        &self,
        _request: &MatchRequest,
        trip: &Trip,
        user: &User,
        now: DateTime<Utc>,
    ) -> JoinDecision {
        if !trip.is_open() {
            return JoinDecision::Rejected(JoinRejection::TripClosed);
        }
        if trip.available_seats == 0 {
            return JoinDecision::Rejected(JoinRejection::SeatsFull);
        }
        if self.config.enforce_gender_preference {
            if let Some(preference) = trip.gender_preference {
                if preference != user.gender {
                    return JoinDecision::Rejected(JoinRejection::GenderMismatch);
                }
            }
        }
        if now > trip.start_time {
            return JoinDecision::Rejected(JoinRejection::AlreadyStarted);
        }
        JoinDecision::Allowed
    }

    /// Check the rider account itself (institutional email).
    pub fn check_user(&self, user: &User) -> Result<(), InputError> {
        user.validate(&self.config.institutional_domain)
    }
}

/// [`TripValidator::can_join`] with the default rules.
pub fn can_join(request: &MatchRequest, trip: &Trip, user: &User, now: DateTime<Utc>) -> JoinDecision {
    TripValidator::default().can_join(request, trip, user, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{campus_request, campus_trip, student, test_time};
    use crate::model::{Gender, TripStatus};
    use chrono::Duration;

    #[test]
    fn open_trip_with_seats_before_start_is_allowed() {
        let trip = campus_trip("t1");
        let now = trip.start_time - Duration::minutes(5);
        let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), now);
        assert_eq!(decision.as_tuple(), (true, JOIN_ALLOWED_REASON));
    }

    #[test]
    fn status_is_checked_before_seats() {
        let trip = campus_trip("t1")
            .with_status(TripStatus::Full)
            .with_available_seats(0);
        let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), test_time());
        assert_eq!(decision.rejection(), Some(JoinRejection::TripClosed));
    }

    #[test]
    fn start_instant_itself_is_still_joinable() {
        let trip = campus_trip("t1");
        let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), trip.start_time);
        assert!(decision.is_allowed());
    }

    #[test]
    fn gender_preference_is_ignored_unless_enabled() {
        let trip = campus_trip("t1").with_gender_preference(Gender::Female);
        let mut rider = student("u1");
        rider.gender = Gender::Male;
        let request = campus_request(test_time());
        let now = trip.start_time - Duration::minutes(1);

        assert!(can_join(&request, &trip, &rider, now).is_allowed());

        let strict = TripValidator::new(ValidatorConfig {
            enforce_gender_preference: true,
            ..Default::default()
        });
        assert_eq!(
            strict.can_join(&request, &trip, &rider, now).rejection(),
            Some(JoinRejection::GenderMismatch)
        );
        rider.gender = Gender::Female;
        assert!(strict.can_join(&request, &trip, &rider, now).is_allowed());
    }
}
