//! The geo-tagged listing abstraction.
//!
//! Services, products and businesses live in storage models owned by the
//! web tier; ranking only needs their addresses and quality signals, so
//! it sees them through the [`GeoTagged`] trait.

use garilink_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// An address record attached to a listing.
///
/// Coordinates are optional: plenty of listings carry a street address
/// without geocoded positions. Such listings rank as infinitely far,
/// never as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Latitude in degrees, when geocoded.
    pub latitude: Option<f64>,
    /// Longitude in degrees, when geocoded.
    pub longitude: Option<f64>,
    /// Whether this is the listing's canonical address.
    pub is_primary: bool,
    /// Display label ("Workshop", "Spare parts counter", ...).
    pub label: Option<String>,
}

impl Address {
    /// Convenience constructor for a geocoded, non-primary address.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            is_primary: false,
            label: None,
        }
    }

    /// Marks this address as the listing's primary one.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// The address coordinate, when both components are geocoded.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

/// A listing that can be ranked by proximity.
///
/// `Send + Sync` because ranked collections cross task boundaries in the
/// listing adapter.
pub trait GeoTagged: Send + Sync {
    /// Zero or more address records for this listing.
    fn addresses(&self) -> &[Address];

    /// Average rating, used for quality ordering.
    fn rating(&self) -> f64;

    /// Number of reviews, used for quality ordering.
    fn review_count(&self) -> u64;

    /// Categorical service type ("mechanic", "tyres", ...), if any.
    fn category(&self) -> Option<&str>;

    /// The canonical address: the first one flagged primary, falling
    /// back to the first address in the collection.
    fn primary_address(&self) -> Option<&Address> {
        let addresses = self.addresses();
        addresses
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| addresses.first())
    }

    /// The coordinate of the primary address, when geocoded.
    fn coordinate(&self) -> Option<Coordinate> {
        self.primary_address().and_then(Address::coordinate)
    }
}
