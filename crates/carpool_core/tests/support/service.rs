#![allow(dead_code)]

use std::sync::Arc;

use carpool_core::clock::FixedClock;
use carpool_core::config::EngineConfig;
use carpool_core::model::{Trip, User};
use carpool_core::routing::{RouteProvider, StraightLineRouteProvider};
use carpool_core::service::MatchService;
use carpool_core::store::{InMemoryTripStore, InMemoryUserStore};
use carpool_core::test_helpers::{student, test_time};
use chrono::{DateTime, Duration, Utc};

/// Builder configuration for reproducible match services.
pub struct TestServiceConfig {
    pub trips: Vec<Trip>,
    pub users: Vec<User>,
    pub engine: EngineConfig,
    pub provider: Arc<dyn RouteProvider>,
    pub now: DateTime<Utc>,
}

impl Default for TestServiceConfig {
    fn default() -> Self {
        Self {
            trips: Vec::new(),
            users: vec![student("rider")],
            engine: EngineConfig::default(),
            provider: Arc::new(StraightLineRouteProvider::default()),
            now: test_time() - Duration::minutes(10),
        }
    }
}

impl TestServiceConfig {
    pub fn with_trips(mut self, trips: Vec<Trip>) -> Self {
        self.trips = trips;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_provider(mut self, provider: impl RouteProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn build(self) -> MatchService {
        let trips = InMemoryTripStore::from_trips(self.trips).expect("fixture trips are valid");
        let users = InMemoryUserStore::from_users(self.users);
        MatchService::new(Arc::new(trips), Arc::new(users), self.provider, &self.engine)
            .with_clock(Arc::new(FixedClock(self.now)))
    }
}
