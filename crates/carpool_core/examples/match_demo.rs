//! Runs one match search over a handful of campus trips and prints the result.
//!
//! ```sh
//! RUST_LOG=carpool_core=debug cargo run -p carpool_core --example match_demo
//! ```

use std::sync::Arc;

use carpool_core::clock::FixedClock;
use carpool_core::config::EngineConfig;
use carpool_core::geo::LocationPoint;
use carpool_core::model::{Gender, MatchRequest, Trip, User};
use carpool_core::routing::build_route_provider;
use carpool_core::service::MatchService;
use carpool_core::store::{InMemoryTripStore, InMemoryUserStore};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => carpool_core::config::load_config(std::path::Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let departure = Utc
        .with_ymd_and_hms(2025, 12, 4, 18, 30, 0)
        .single()
        .ok_or("invalid departure time")?;
    let dorm = LocationPoint::new("E6 dorm", 22.2106, 113.5466)?;
    let library = LocationPoint::new("Library", 22.2118, 113.5478)?;
    let gate = LocationPoint::new("Border gate", 22.2166, 113.5495)?;
    let taipa = LocationPoint::new("Taipa ferry", 22.1645, 113.5758)?;

    let trips = vec![
        Trip::new("t-gate", "d-1", dorm.clone(), gate.clone(), departure, 3, Decimal::new(15, 0))?,
        Trip::new(
            "t-gate-late",
            "d-2",
            library.clone(),
            gate.clone(),
            departure + Duration::minutes(12),
            4,
            Decimal::new(12, 0),
        )?,
        Trip::new("t-ferry", "d-3", dorm.clone(), taipa, departure, 2, Decimal::new(30, 0))?,
    ];
    let rider = User {
        id: "rider-1".to_string(),
        name: "Chen".to_string(),
        student_id: "2230001".to_string(),
        school_email: "chen@must.edu.mo".to_string(),
        gender: Gender::Unknown,
        is_verified: true,
    };

    let provider = build_route_provider(&config.routing);
    let service = MatchService::new(
        Arc::new(InMemoryTripStore::from_trips(trips)?),
        Arc::new(InMemoryUserStore::from_users([rider])),
        Arc::from(provider),
        &config,
    )
    .with_clock(Arc::new(FixedClock(departure - Duration::minutes(20))));

    let request = MatchRequest::new(library, gate, departure + Duration::minutes(3));
    let matches = service.find_matches("rider-1", &request).await?;

    println!("{} match(es) for {} -> {}", matches.len(), request.from, request.to);
    for found in &matches {
        let extra = found
            .detour
            .map(|d| format!("{:.0}s extra", d.extra_time_secs))
            .unwrap_or_else(|| "detour not checked".to_string());
        println!(
            "  {:<12} score {:.3}  {} seat(s)  {} MOP  {}",
            found.trip.id, found.score, found.trip.available_seats, found.trip.price_per_person, extra
        );
    }
    Ok(())
}
