//! Proximity ranking for GariLink listings.
//!
//! Given a user coordinate and a collection of geo-tagged listings
//! (services, products, businesses), this crate filters by radius, sorts
//! by distance, rating or review count, buckets results into distance
//! tiers and computes density statistics. It also provides the listing
//! adapter that re-orders storage query results by distance before
//! truncating to a page.
//!
//! Nothing here performs I/O except the adapter's injected
//! [`ListingSource`]; ranking itself is pure and safe to call from any
//! task without coordination.
//!
//! # Example
//!
//! ```
//! use garilink_proximity::{find_nearby, Address, GeoTagged, NearbyOptions};
//! use garilink_geo::Coordinate;
//!
//! struct Garage {
//!     addresses: Vec<Address>,
//! }
//!
//! impl GeoTagged for Garage {
//!     fn addresses(&self) -> &[Address] {
//!         &self.addresses
//!     }
//!     fn rating(&self) -> f64 {
//!         4.5
//!     }
//!     fn review_count(&self) -> u64 {
//!         12
//!     }
//!     fn category(&self) -> Option<&str> {
//!         Some("mechanic")
//!     }
//! }
//!
//! let garages = vec![Garage {
//!     addresses: vec![Address::at(-1.3031, 36.8331)],
//! }];
//!
//! let user = Coordinate::new(-1.2921, 36.8219);
//! let ranked = find_nearby(user, garages, &NearbyOptions::default());
//! assert_eq!(ranked.len(), 1);
//! assert!(ranked[0].distance_km.unwrap() < 5.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod adapter;
mod density;
mod entity;
mod rank;
#[cfg(test)]
mod testutil;
mod tier;

pub use adapter::{
    nearby_listings, ListingKind, ListingSource, SourceError, SourceErrorCode, OVERFETCH_FACTOR,
};
pub use density::{service_density, DensityReport, DEFAULT_DENSITY_RADIUS_KM};
pub use entity::{Address, GeoTagged};
pub use rank::{find_nearby, NearbyOptions, Ranked, SortKey};
pub use tier::{group_by_tier, DistanceTier, TierBuckets};

// Display helpers live with the distance math; re-exported here so the
// web tier only needs one crate for ranked-listing presentation.
pub use garilink_geo::{estimate_travel_time, format_distance, Coordinate, TravelMode};
