//! Geospatial primitives for GariLink.
//!
//! This crate provides:
//! - Haversine great-circle distance calculations
//! - Human-readable distance and travel-time formatting
//! - Coordinate validation for manual location entry
//!
//! Everything here is pure and synchronous. Ranking and location
//! acquisition build on top of it in their own crates.
//!
//! # Example
//!
//! ```
//! use garilink_geo::{haversine_distance, Coordinate};
//!
//! let cbd = Coordinate::new(-1.2921, 36.8219);       // Nairobi CBD
//! let westlands = Coordinate::new(-1.3031, 36.8331); // Westlands
//!
//! let distance_km = haversine_distance(&cbd, &westlands);
//! assert!((distance_km - 1.6).abs() < 0.2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod format;
mod haversine;

pub use error::{GeoError, GeoErrorCode, Result};
pub use format::{estimate_travel_time, format_distance, TravelMode};
pub use haversine::{
    approximate_distance, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without validation.
    ///
    /// Listing data is validated upstream; use [`Coordinate::try_new`] at
    /// edges that accept manual input.
    #[inline]
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting out-of-range values.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] if latitude is outside
    /// [-90, 90] or longitude is outside [-180, 180].
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self { latitude, longitude };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) out of range"
            )))
        }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.latitude.is_finite()
            && self.longitude.is_finite()
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(-1.2921, 36.8219);
        assert_eq!(coord.latitude, -1.2921);
        assert_eq!(coord.longitude, 36.8219);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(-1.2921, 36.8219).is_ok());
        let err = Coordinate::try_new(-95.0, 36.8219).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (-1.2921, 36.8219).into();
        assert_eq!(coord.latitude, -1.2921);
    }
}
