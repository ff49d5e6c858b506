//! Pluggable routing providers: travel-time estimates for a single leg.
//!
//! Implementations, selectable via [`RouteProviderKind`]:
//!
//! - **`StraightLineRouteProvider`**: haversine distance at an assumed speed. Always available.
//! - **`OsrmRouteProvider`** (feature `osrm`): calls an OSRM HTTP endpoint.
//! - **`PrecomputedRouteProvider`** (feature `precomputed`): loads a serialized leg table from disk.
//!
//! Remote providers are wrapped in a [`CachedRouteProvider`] that falls back to
//! the straight-line estimate when the backend fails.

pub mod cached;
#[cfg(feature = "osrm")]
pub mod osrm;
#[cfg(feature = "precomputed")]
pub mod precomputed;
pub mod straight_line;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::geo::Coordinate;

pub use cached::CachedRouteProvider;
pub use straight_line::StraightLineRouteProvider;

/// How the leg is travelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Automobile,
    Walking,
}

impl TransportMode {
    /// OSRM profile name for this mode.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TransportMode::Automobile => "driving",
            TransportMode::Walking => "foot",
        }
    }
}

/// Trait for routing backends. Implementations must be `Send + Sync` so one
/// provider can serve concurrent leg requests.
pub trait RouteProvider: Send + Sync {
    /// Estimated travel time in seconds from `from` to `to`.
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>>;
}

/// Directional cache/table key. Coordinates are quantized to 1e-6 degrees
/// (about 11 cm) so float noise does not split entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegKey {
    pub from: (i64, i64),
    pub to: (i64, i64),
    pub mode: TransportMode,
}

impl LegKey {
    pub fn new(from: Coordinate, to: Coordinate, mode: TransportMode) -> Self {
        Self {
            from: quantize(from),
            to: quantize(to),
            mode,
        }
    }
}

fn quantize(coordinate: Coordinate) -> (i64, i64) {
    const SCALE: f64 = 1e6;
    (
        (coordinate.latitude * SCALE).round() as i64,
        (coordinate.longitude * SCALE).round() as i64,
    )
}

/// Which routing backend to use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteProviderKind {
    /// Haversine distance at a fixed speed, no external dependencies.
    StraightLine {
        #[serde(default = "straight_line::default_speed_kmh")]
        speed_kmh: f64,
    },
    /// OSRM HTTP endpoint (e.g. `"http://localhost:5000"`).
    #[cfg(feature = "osrm")]
    Osrm { endpoint: String },
    /// Pre-computed leg table loaded from a binary file at startup.
    #[cfg(feature = "precomputed")]
    Precomputed { path: String },
}

impl Default for RouteProviderKind {
    fn default() -> Self {
        RouteProviderKind::StraightLine {
            speed_kmh: straight_line::default_speed_kmh(),
        }
    }
}

/// Default leg cache capacity for remote providers.
#[cfg(any(feature = "osrm", feature = "precomputed"))]
const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 20_000;

/// Construct a boxed [`RouteProvider`] from a [`RouteProviderKind`] descriptor.
///
/// - `StraightLine` is returned without caching (it is pure arithmetic).
/// - `Osrm` and `Precomputed` are wrapped in a [`CachedRouteProvider`] with
///   straight-line fallback. If the backend cannot be constructed the
///   straight-line provider is returned instead.
pub fn build_route_provider(kind: &RouteProviderKind) -> Box<dyn RouteProvider> {
    match kind {
        RouteProviderKind::StraightLine { speed_kmh } => {
            Box::new(StraightLineRouteProvider::new(*speed_kmh))
        }

        #[cfg(feature = "osrm")]
        RouteProviderKind::Osrm { endpoint } => match osrm::OsrmRouteProvider::new(endpoint) {
            Ok(provider) => Box::new(CachedRouteProvider::new(
                Box::new(provider),
                DEFAULT_ROUTE_CACHE_CAPACITY,
                true,
            )),
            Err(error) => {
                tracing::warn!(%endpoint, %error, "failed to build OSRM provider, using straight-line estimates");
                Box::new(StraightLineRouteProvider::default())
            }
        },

        #[cfg(feature = "precomputed")]
        RouteProviderKind::Precomputed { path } => {
            match precomputed::PrecomputedRouteProvider::from_file(path) {
                Ok(provider) => Box::new(CachedRouteProvider::new(
                    Box::new(provider),
                    DEFAULT_ROUTE_CACHE_CAPACITY,
                    true,
                )),
                Err(error) => {
                    tracing::warn!(%path, %error, "failed to load leg table, using straight-line estimates");
                    Box::new(StraightLineRouteProvider::default())
                }
            }
        }
    }
}
