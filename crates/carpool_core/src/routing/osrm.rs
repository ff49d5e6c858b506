//! Leg travel times from an OSRM `/route` endpoint.

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::RoutingError;
use crate::geo::Coordinate;

use super::{RouteProvider, TransportMode};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin async HTTP client for OSRM route durations.
#[derive(Debug, Clone)]
pub struct OsrmRouteProvider {
    client: Client,
    endpoint: String,
}

impl OsrmRouteProvider {
    /// Create a provider for the given OSRM endpoint (e.g. `http://localhost:5000`).
    pub fn new(endpoint: &str) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| RoutingError::Http(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> Result<Url, RoutingError> {
        let (from_lat, from_lon): (f64, f64) = from.into();
        let (to_lat, to_lon): (f64, f64) = to.into();
        // OSRM takes lon,lat.
        let base = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.endpoint,
            mode.osrm_profile(),
            from_lon,
            from_lat,
            to_lon,
            to_lat,
        );
        let mut url = Url::parse(&base)
            .map_err(|err| RoutingError::Api(format!("failed to build OSRM URL: {}", err)))?;
        url.query_pairs_mut()
            .append_pair("overview", "false")
            .append_pair("alternatives", "false");
        Ok(url)
    }

    async fn fetch_duration(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> Result<f64, RoutingError> {
        let url = self.route_url(from, to, mode)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| RoutingError::Http(err.to_string()))?;
        let parsed: OsrmRouteResponse = response
            .json()
            .await
            .map_err(|err| RoutingError::InvalidResponse(err.to_string()))?;
        parse_route_response(parsed)
    }
}

impl RouteProvider for OsrmRouteProvider {
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> BoxFuture<'_, Result<f64, RoutingError>> {
        self.fetch_duration(from, to, mode).boxed()
    }
}

/// Minimal OSRM JSON response structures.
#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64, // seconds
}

fn parse_route_response(resp: OsrmRouteResponse) -> Result<f64, RoutingError> {
    if resp.code != "Ok" {
        return Err(RoutingError::Api(resp.code));
    }
    let route = resp
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or(RoutingError::NoRoute)?;
    if !route.duration.is_finite() || route.duration < 0.0 {
        return Err(RoutingError::InvalidResponse(format!(
            "duration {}",
            route.duration
        )));
    }
    Ok(route.duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_takes_first_route_duration() {
        let resp = OsrmRouteResponse {
            code: "Ok".to_string(),
            routes: Some(vec![OsrmRoute { duration: 412.5 }, OsrmRoute { duration: 900.0 }]),
        };
        assert_eq!(parse_route_response(resp), Ok(412.5));
    }

    #[test]
    fn parse_maps_error_code() {
        let resp = OsrmRouteResponse {
            code: "NoSegment".to_string(),
            routes: None,
        };
        assert_eq!(
            parse_route_response(resp),
            Err(RoutingError::Api("NoSegment".to_string()))
        );
    }

    #[test]
    fn parse_rejects_empty_routes() {
        let resp = OsrmRouteResponse {
            code: "Ok".to_string(),
            routes: Some(Vec::new()),
        };
        assert_eq!(parse_route_response(resp), Err(RoutingError::NoRoute));
    }

    #[test]
    fn url_uses_lon_lat_order_and_profile() {
        let provider = OsrmRouteProvider::new("http://localhost:5000/").expect("client");
        let from = Coordinate::new(22.2106, 113.5466).expect("valid");
        let to = Coordinate::new(22.2166, 113.5495).expect("valid");
        let url = provider
            .route_url(from, to, TransportMode::Walking)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/route/v1/foot/113.546600,22.210600;113.549500,22.216600?overview=false&alternatives=false"
        );
    }
}
