//! Domain records consumed by the matching core: ride requests, driver trips
//! and rider accounts.
//!
//! Trips and users are owned by external stores. The core only reads them;
//! seat counts and status changes are applied by the trip-management side.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geo::LocationPoint;

/// Upper bound on seats a driver can offer on one trip.
pub const MAX_SEATS: u32 = 6;

/// A rider's desired trip, created per search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub from: LocationPoint,
    pub to: LocationPoint,
    pub time: DateTime<Utc>,
}

impl MatchRequest {
    pub fn new(from: LocationPoint, to: LocationPoint, time: DateTime<Utc>) -> Self {
        Self { from, to, time }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.from.validate()?;
        self.to.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripStatus {
    Open,
    Full,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// Whether the trip lifecycle allows moving from `self` to `next`.
    ///
    /// `Full -> Open` happens when a rider leaves and frees a seat.
    pub fn can_transition_to(self, next: TripStatus) -> bool {
        use TripStatus::*;
        match (self, next) {
            (Open, Full) | (Full, Open) => true,
            (Open | Full, InProgress) => true,
            (InProgress, Completed) => true,
            (Open | Full | InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// A driver-published ride offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub driver_id: String,
    pub start_location: LocationPoint,
    pub end_location: LocationPoint,
    pub start_time: DateTime<Utc>,
    pub total_seats: u32,
    pub available_seats: u32,
    pub price_per_person: Decimal,
    pub status: TripStatus,
    /// Driver waypoints, start first and end last.
    #[serde(default)]
    pub route_points: Vec<LocationPoint>,
    #[serde(default)]
    pub gender_preference: Option<Gender>,
}

impl Trip {
    /// Open trip with every seat available and a direct start-to-end route.
    pub fn new(
        id: impl Into<String>,
        driver_id: impl Into<String>,
        start_location: LocationPoint,
        end_location: LocationPoint,
        start_time: DateTime<Utc>,
        total_seats: u32,
        price_per_person: Decimal,
    ) -> Result<Self, InputError> {
        let trip = Self {
            id: id.into(),
            driver_id: driver_id.into(),
            route_points: vec![start_location.clone(), end_location.clone()],
            start_location,
            end_location,
            start_time,
            total_seats,
            available_seats: total_seats,
            price_per_person,
            status: TripStatus::Open,
            gender_preference: None,
        };
        trip.validate()?;
        Ok(trip)
    }

    pub fn with_available_seats(mut self, available_seats: u32) -> Self {
        self.available_seats = available_seats;
        self
    }

    pub fn with_status(mut self, status: TripStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_route_points(mut self, route_points: Vec<LocationPoint>) -> Self {
        self.route_points = route_points;
        self
    }

    pub fn with_gender_preference(mut self, preference: Gender) -> Self {
        self.gender_preference = Some(preference);
        self
    }

    /// Driver route used for detour checks: the waypoints when present,
    /// otherwise the direct start/end pair.
    pub fn route(&self) -> Vec<LocationPoint> {
        if self.route_points.is_empty() {
            vec![self.start_location.clone(), self.end_location.clone()]
        } else {
            self.route_points.clone()
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TripStatus::Open
    }

    /// Check the seat and price invariants a stored trip must hold.
    pub fn validate(&self) -> Result<(), InputError> {
        let invalid = |reason: String| InputError::InvalidTrip {
            id: self.id.clone(),
            reason,
        };
        if self.total_seats == 0 {
            return Err(invalid("total seats must be positive".to_string()));
        }
        if self.total_seats > MAX_SEATS {
            return Err(invalid(format!(
                "total seats {} exceeds the limit of {}",
                self.total_seats, MAX_SEATS
            )));
        }
        if self.available_seats > self.total_seats {
            return Err(invalid(format!(
                "available seats {} exceed total seats {}",
                self.available_seats, self.total_seats
            )));
        }
        if self.price_per_person.is_sign_negative() && !self.price_per_person.is_zero() {
            return Err(invalid("price per person must not be negative".to_string()));
        }
        self.start_location.validate()?;
        self.end_location.validate()?;
        self.route_points.iter().try_for_each(LocationPoint::validate)
    }
}

/// A registered student account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub student_id: String,
    pub school_email: String,
    pub gender: Gender,
    pub is_verified: bool,
}

impl User {
    /// Check that the school email belongs to `institutional_domain` or one
    /// of its subdomains (`@must.edu.mo` passes for `edu.mo`).
    pub fn validate(&self, institutional_domain: &str) -> Result<(), InputError> {
        let invalid = || InputError::InvalidEmail {
            email: self.school_email.clone(),
            domain: institutional_domain.to_string(),
        };
        let email = self.school_email.trim().to_ascii_lowercase();
        let domain = institutional_domain
            .trim()
            .trim_start_matches('@')
            .to_ascii_lowercase();

        let (local, host) = email.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || host.contains('@') || domain.is_empty() {
            return Err(invalid());
        }
        let suffix = format!(".{domain}");
        if host == domain || host.ends_with(&suffix) {
            Ok(())
        } else {
            Err(invalid())
        }
    }
}
