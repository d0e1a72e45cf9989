//! Shared test fixtures: Nairobi-area garages.

use crate::entity::{Address, GeoTagged};
use garilink_geo::Coordinate;

pub(crate) const CBD: Coordinate = Coordinate { latitude: -1.2921, longitude: 36.8219 };
/// ~1.6 km from the CBD.
pub(crate) const WESTLANDS: Coordinate = Coordinate { latitude: -1.3031, longitude: 36.8331 };
/// ~13 km from the CBD.
pub(crate) const KAREN: Coordinate = Coordinate { latitude: -1.3194, longitude: 36.7085 };
/// ~40 km from the CBD.
pub(crate) const THIKA: Coordinate = Coordinate { latitude: -1.0333, longitude: 37.0693 };

#[derive(Debug, Clone)]
pub(crate) struct Garage {
    pub name: String,
    pub rating: f64,
    pub reviews: u64,
    pub category: String,
    pub addresses: Vec<Address>,
}

impl GeoTagged for Garage {
    fn addresses(&self) -> &[Address] {
        &self.addresses
    }
    fn rating(&self) -> f64 {
        self.rating
    }
    fn review_count(&self) -> u64 {
        self.reviews
    }
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

pub(crate) fn garage(
    name: &str,
    at: impl Into<Coordinate>,
    rating: f64,
    reviews: u64,
    category: &str,
) -> Garage {
    let coord = at.into();
    Garage {
        name: name.to_string(),
        rating,
        reviews,
        category: category.to_string(),
        addresses: vec![Address::at(coord.latitude, coord.longitude).primary()],
    }
}

pub(crate) fn no_address_garage(name: &str) -> Garage {
    Garage {
        name: name.to_string(),
        rating: 4.0,
        reviews: 10,
        category: "mechanic".to_string(),
        addresses: Vec::new(),
    }
}
