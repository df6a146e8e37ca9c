use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`Coordinate`] from raw degrees.
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A validated (latitude, longitude) pair in degrees.
///
/// Construction rejects out-of-range values (including NaN) so that the
/// ranking pipeline never has to re-check its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

/// A point of interest from the regional dataset.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A place annotated with its distance from the requested origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlace {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

impl RankedPlace {
    pub fn from_place(place: Place, distance_km: f64) -> Self {
        Self {
            name: place.name,
            description: place.description,
            image: place.image,
            category: place.category,
            latitude: place.latitude,
            longitude: place.longitude,
            distance_km,
        }
    }
}

/// Geospatial bounding box used to pre-filter places before the exact
/// haversine check.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
