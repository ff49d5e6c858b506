use carpool_core::config::ValidatorConfig;
use carpool_core::model::{Gender, TripStatus};
use carpool_core::test_helpers::{campus_request, campus_trip, student, test_time};
use carpool_core::validator::{can_join, JoinRejection, TripValidator, JOIN_ALLOWED_REASON};
use chrono::Duration;

fn before_start() -> chrono::DateTime<chrono::Utc> {
    test_time() - Duration::minutes(30)
}

#[test]
fn closed_statuses_are_rejected_with_reason() {
    let request = campus_request(test_time());
    let rider = student("u1");
    for status in [
        TripStatus::Full,
        TripStatus::InProgress,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ] {
        let trip = campus_trip("t1").with_status(status);
        let decision = can_join(&request, &trip, &rider, before_start());
        assert_eq!(decision.as_tuple(), (false, "trip closed or finished"), "{status:?}");
    }
}

#[test]
fn open_trip_without_seats_is_full() {
    let trip = campus_trip("t1").with_available_seats(0);
    let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), before_start());
    assert_eq!(decision.rejection(), Some(JoinRejection::SeatsFull));
    assert_eq!(decision.reason(), "seats full");
}

#[test]
fn seats_are_checked_before_start_time() {
    let trip = campus_trip("t1").with_available_seats(0);
    let after_start = trip.start_time + Duration::hours(1);
    let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), after_start);
    assert_eq!(decision.rejection(), Some(JoinRejection::SeatsFull));
}

#[test]
fn one_second_after_start_is_too_late() {
    let trip = campus_trip("t1");
    let decision = can_join(
        &campus_request(test_time()),
        &trip,
        &student("u1"),
        trip.start_time + Duration::seconds(1),
    );
    assert_eq!(decision.as_tuple(), (false, "trip already started"));
}

#[test]
fn last_seat_can_still_be_taken() {
    let trip = campus_trip("t1").with_available_seats(1);
    let decision = can_join(&campus_request(test_time()), &trip, &student("u1"), before_start());
    assert_eq!(decision.as_tuple(), (true, JOIN_ALLOWED_REASON));
}

#[test]
fn gender_check_runs_after_seats_when_enabled() {
    let validator = TripValidator::new(ValidatorConfig {
        enforce_gender_preference: true,
        ..Default::default()
    });
    let mut rider = student("u1");
    rider.gender = Gender::Male;

    let full = campus_trip("t1")
        .with_gender_preference(Gender::Female)
        .with_available_seats(0);
    assert_eq!(
        validator
            .can_join(&campus_request(test_time()), &full, &rider, before_start())
            .rejection(),
        Some(JoinRejection::SeatsFull)
    );

    let open = campus_trip("t2").with_gender_preference(Gender::Female);
    let decision = validator.can_join(&campus_request(test_time()), &open, &rider, before_start());
    assert_eq!(decision.reason(), "driver restricts gender");
}

#[test]
fn check_user_uses_configured_domain() {
    let validator = TripValidator::new(ValidatorConfig {
        institutional_domain: "must.edu.mo".to_string(),
        ..Default::default()
    });
    assert!(validator.check_user(&student("u1")).is_ok());

    let mut other = student("u2");
    other.school_email = "u2@um.edu.mo".to_string();
    assert!(validator.check_user(&other).is_err());
}
