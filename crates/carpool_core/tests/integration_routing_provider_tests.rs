use std::sync::Arc;

use carpool_core::config::DetourConfig;
use carpool_core::detour::DetourEvaluator;
use carpool_core::routing::{
    build_route_provider, CachedRouteProvider, RouteProvider, RouteProviderKind,
    StraightLineRouteProvider, TransportMode,
};
use carpool_core::test_helpers::{
    border_gate, e6_dorm, offset_point, LegScript, ScriptedRouteProvider,
};

#[test]
fn route_provider_kind_default_is_straight_line() {
    assert_eq!(
        RouteProviderKind::default(),
        RouteProviderKind::StraightLine { speed_kmh: 40.0 }
    );
}

#[tokio::test]
async fn build_route_provider_straight_line() {
    let provider = build_route_provider(&RouteProviderKind::StraightLine { speed_kmh: 20.0 });
    let secs = provider
        .travel_time(
            e6_dorm().coordinate(),
            border_gate().coordinate(),
            TransportMode::Automobile,
        )
        .await
        .expect("estimate");
    let expected = e6_dorm().distance_to(&border_gate()) / 1_000.0 / 20.0 * 3_600.0;
    assert!((secs - expected).abs() < 1e-6, "got {secs}, expected {expected}");
}

#[tokio::test]
async fn cached_provider_serves_concurrent_detour_checks() {
    let scripted = ScriptedRouteProvider::new().with_default(LegScript::Secs(120.0));
    let calls = scripted.call_counter();
    let cached: Arc<dyn RouteProvider> =
        Arc::new(CachedRouteProvider::new(Box::new(scripted), 64, false));
    let evaluator = DetourEvaluator::new(cached, DetourConfig::default());

    let route = vec![e6_dorm(), border_gate()];
    let pickup = offset_point(&e6_dorm(), 150.0, 0.0);
    let dropoff = offset_point(&border_gate(), 0.0, 150.0);

    let first = evaluator
        .check_detour(&route, &pickup, &dropoff)
        .await
        .expect("decision");
    let calls_after_first = calls.get();
    let second = evaluator
        .check_detour(&route, &pickup, &dropoff)
        .await
        .expect("decision");

    assert_eq!(first, second);
    assert_eq!(calls_after_first, 4);
    assert_eq!(calls.get(), calls_after_first);
}

#[tokio::test]
async fn straight_line_fallback_replaces_failing_backend() {
    let failing = ScriptedRouteProvider::new();
    let cached = CachedRouteProvider::new(Box::new(failing), 8, true);
    let from = e6_dorm().coordinate();
    let to = border_gate().coordinate();

    let secs = cached
        .travel_time(from, to, TransportMode::Walking)
        .await
        .expect("fallback");
    let expected = StraightLineRouteProvider::default()
        .estimate_secs(from, to, TransportMode::Walking)
        .expect("estimate");
    assert!((secs - expected).abs() < 1e-9);
}

#[cfg(feature = "precomputed")]
#[tokio::test]
async fn missing_precomputed_table_falls_back_to_straight_line() {
    let provider = build_route_provider(&RouteProviderKind::Precomputed {
        path: "/nonexistent/legs.bin".to_string(),
    });
    let secs = provider
        .travel_time(
            e6_dorm().coordinate(),
            border_gate().coordinate(),
            TransportMode::Automobile,
        )
        .await
        .expect("estimate");
    assert!(secs > 0.0);
}
