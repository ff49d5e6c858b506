//! Geographic primitives: validated coordinates, named location points and
//! great-circle distance.
//!
//! Distances use the haversine formula on a sphere of mean Earth radius. At
//! campus scale (a few kilometres) the error against the WGS-84 ellipsoid is
//! well below a metre, so the 1 km matching cutoffs behave consistently.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Reject non-finite values and anything outside [-90, 90] x [-180, 180].
    pub fn validate(&self) -> Result<(), InputError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(InputError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_distance_m(*self, *other)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

/// Great-circle distance between two coordinates in metres.
pub fn haversine_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// A named place on the map. Always holds a valid coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocationPoint")]
pub struct LocationPoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawLocationPoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocationPoint> for LocationPoint {
    type Error = InputError;

    fn try_from(raw: RawLocationPoint) -> Result<Self, Self::Error> {
        LocationPoint::new(raw.name, raw.latitude, raw.longitude)
    }
}

impl LocationPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, InputError> {
        Coordinate::new(latitude, longitude)?;
        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
        })
    }

    /// Re-check the coordinate range. Construction already enforces it, so
    /// this only fails for values built outside this module.
    pub fn validate(&self) -> Result<(), InputError> {
        self.coordinate().validate()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &LocationPoint) -> f64 {
        haversine_distance_m(self.coordinate(), other.coordinate())
    }
}

impl Display for LocationPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.coordinate())
    }
}
