use std::collections::HashMap;
use std::fs;

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::error::RoutingError;
use crate::geo::Coordinate;

use super::{LegKey, RouteProvider, TransportMode};

/// Pre-computed leg table: travel seconds per directional [`LegKey`].
pub struct PrecomputedRouteProvider {
    table: HashMap<LegKey, f64>,
}

impl PrecomputedRouteProvider {
    /// Load from a bincode-serialized file.
    pub fn from_file(path: &str) -> Result<Self, RoutingError> {
        let data = fs::read(path).map_err(|err| RoutingError::Table(err.to_string()))?;
        let table: HashMap<LegKey, f64> =
            bincode::deserialize(&data).map_err(|err| RoutingError::Table(err.to_string()))?;
        Ok(Self { table })
    }

    /// Create from an in-memory table (useful for tests).
    pub fn from_table(table: HashMap<LegKey, f64>) -> Self {
        Self { table }
    }

    /// Serialize a table to a file.
    pub fn save_to_file(table: &HashMap<LegKey, f64>, path: &str) -> Result<(), RoutingError> {
        let data = bincode::serialize(table).map_err(|err| RoutingError::Table(err.to_string()))?;
        fs::write(path, data).map_err(|err| RoutingError::Table(err.to_string()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl RouteProvider for PrecomputedRouteProvider {
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>> {
        let result = self
            .table
            .get(&LegKey::new(from, to, mode))
            .copied()
            .ok_or(RoutingError::NoRoute);
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn table_round_trips_through_disk() {
        let a = Coordinate::new(22.2106, 113.5466).expect("valid");
        let b = Coordinate::new(22.2166, 113.5495).expect("valid");
        let mut table = HashMap::new();
        table.insert(LegKey::new(a, b, TransportMode::Automobile), 420.0);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("legs.bin");
        let path = path.to_str().expect("utf-8 path");
        PrecomputedRouteProvider::save_to_file(&table, path).expect("save");

        let provider = PrecomputedRouteProvider::from_file(path).expect("load");
        assert_eq!(provider.len(), 1);
        assert_eq!(
            provider.travel_time(a, b, TransportMode::Automobile).await,
            Ok(420.0)
        );
        assert_eq!(
            provider.travel_time(b, a, TransportMode::Automobile).await,
            Err(RoutingError::NoRoute)
        );
    }

    #[test]
    fn missing_file_is_a_table_error() {
        let result = PrecomputedRouteProvider::from_file("/nonexistent/legs.bin");
        assert!(matches!(result, Err(RoutingError::Table(_))));
    }
}
