//! Performance benchmarks for carpool_core using Criterion.rs.

use std::sync::Arc;

use carpool_core::config::DetourConfig;
use carpool_core::detour::DetourEvaluator;
use carpool_core::matching::{MatchingEngine, TripScorer};
use carpool_core::routing::StraightLineRouteProvider;
use carpool_core::store::{InMemoryTripStore, TripStore};
use carpool_core::test_helpers::{
    border_gate, campus_request, e6_dorm, offset_point, random_trips, test_time,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_rank(c: &mut Criterion) {
    let engine = MatchingEngine::default();
    let request = campus_request(test_time());

    let mut group = c.benchmark_group("rank");
    for count in [100, 1_000, 10_000] {
        let trips = random_trips(42, count, &e6_dorm(), 1_500.0, test_time());
        group.bench_with_input(BenchmarkId::from_parameter(count), &trips, |b, trips| {
            b.iter(|| black_box(engine.rank(&request, trips, 0.0)));
        });
    }
    group.finish();
}

fn bench_store_lookup(c: &mut Criterion) {
    let trips = random_trips(42, 20_000, &e6_dorm(), 5_000.0, test_time());
    let store = InMemoryTripStore::from_trips(trips).expect("valid trips");
    let request = campus_request(test_time());

    c.bench_function("open_trips_near_1km_of_20k", |b| {
        b.iter(|| black_box(store.open_trips_near(&request.from, 1_000.0)));
    });
}

fn bench_detour(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let evaluator = DetourEvaluator::new(
        Arc::new(StraightLineRouteProvider::default()),
        DetourConfig::default(),
    );
    let pickup = offset_point(&e6_dorm(), 150.0, 0.0);
    let dropoff = offset_point(&border_gate(), 0.0, 150.0);

    let mut group = c.benchmark_group("check_detour");
    for waypoints in [0usize, 4, 16] {
        let mut route = vec![e6_dorm()];
        route.extend((1..=waypoints).map(|i| offset_point(&e6_dorm(), 40.0 * i as f64, 20.0)));
        route.push(border_gate());

        group.bench_with_input(BenchmarkId::from_parameter(waypoints), &route, |b, route| {
            b.to_async(&runtime).iter(|| async {
                black_box(evaluator.check_detour(route, &pickup, &dropoff).await)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank, bench_store_lookup, bench_detour);
criterion_main!(benches);
