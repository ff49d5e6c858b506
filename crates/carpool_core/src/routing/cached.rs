use std::num::NonZeroUsize;
use std::sync::Mutex;

use futures_util::future::{BoxFuture, FutureExt};
use lru::LruCache;

use crate::error::RoutingError;
use crate::geo::Coordinate;

use super::{LegKey, RouteProvider, StraightLineRouteProvider, TransportMode};

/// LRU-cached wrapper around any [`RouteProvider`].
///
/// Cache key is [`LegKey`] (directional). Only successful estimates are
/// cached. On inner failure the optional straight-line fallback is tried
/// before the error is returned.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<LegKey, f64>>,
    fallback: Option<StraightLineRouteProvider>,
}

impl CachedRouteProvider {
    /// Create a caching wrapper with the given capacity (at least 1).
    ///
    /// If `fallback_to_straight_line` is true, inner failures are answered
    /// with a [`StraightLineRouteProvider`] estimate.
    pub fn new(
        inner: Box<dyn RouteProvider>,
        capacity: usize,
        fallback_to_straight_line: bool,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            fallback: fallback_to_straight_line.then(StraightLineRouteProvider::default),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn lookup(&self, key: &LegKey) -> Option<f64> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(key).copied()
    }

    fn store(&self, key: LegKey, secs: f64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, secs);
        }
    }
}

impl RouteProvider for CachedRouteProvider {
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>> {
        async move {
            let key = LegKey::new(from, to, mode);
            if let Some(secs) = self.lookup(&key) {
                return Ok(secs);
            }

            let result = match self.inner.travel_time(from, to, mode).await {
                Ok(secs) => Ok(secs),
                Err(error) => match &self.fallback {
                    Some(fallback) => {
                        tracing::debug!(%error, %from, %to, "routing backend failed, using straight-line estimate");
                        fallback.estimate_secs(from, to, mode)
                    }
                    None => Err(error),
                },
            };

            if let Ok(secs) = result {
                self.store(key, secs);
            }
            result
        }
        .boxed()
    }
}
