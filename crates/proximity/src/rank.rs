//! Radius filtering and sorting of geo-tagged listings.

use crate::entity::GeoTagged;
use garilink_geo::{estimate_travel_time, format_distance, haversine_distance, Coordinate, TravelMode};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// Sort order for [`find_nearby`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Closest first.
    #[default]
    Distance,
    /// Highest rating first. Ties keep input order; distance is not a
    /// secondary key.
    Rating,
    /// Most reviews first. Ties keep input order.
    Reviews,
}

/// Options for [`find_nearby`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyOptions {
    /// Listings farther than this are dropped entirely.
    pub max_distance_km: f64,
    /// Optional categorical filter, applied before any distance work.
    pub category: Option<String>,
    /// Truncation applied after sorting. `None` means unlimited.
    pub limit: Option<usize>,
    /// Sort order.
    pub sort_by: SortKey,
}

impl Default for NearbyOptions {
    fn default() -> Self {
        Self {
            max_distance_km: 50.0,
            category: None,
            limit: Some(20),
            sort_by: SortKey::Distance,
        }
    }
}

impl NearbyOptions {
    /// Options bounded to a radius with no truncation, as used for
    /// density statistics.
    #[must_use]
    pub fn within_radius(radius_km: f64) -> Self {
        Self {
            max_distance_km: radius_km,
            category: None,
            limit: None,
            sort_by: SortKey::Distance,
        }
    }
}

/// A listing decorated with its computed distance.
///
/// Transient ranking output; `distance_km` is `None` when no distance
/// was computed (listing not geocoded, or no user coordinate supplied).
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    /// The underlying listing.
    pub entity: T,
    /// Great-circle distance from the user in kilometers.
    pub distance_km: Option<f64>,
}

impl<T> Ranked<T> {
    /// Display string for the distance ("750m", "4.3km").
    #[must_use]
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }

    /// Display string for the estimated travel time ("30 min", "2h 15m").
    #[must_use]
    pub fn travel_time(&self, mode: TravelMode) -> Option<String> {
        self.distance_km.map(|km| estimate_travel_time(km, mode))
    }
}

/// Distance from `origin` to a listing's primary address.
///
/// Listings without a geocoded address rank as infinitely far, so a
/// finite radius filter always drops them instead of erroring.
pub(crate) fn entity_distance<T: GeoTagged>(origin: Coordinate, entity: &T) -> f64 {
    entity
        .coordinate()
        .map_or(f64::INFINITY, |c| haversine_distance(&origin, &c))
}

/// Filters and sorts listings around a user coordinate.
///
/// Applies the category filter before computing any distances, drops
/// listings beyond `max_distance_km`, sorts stably by the chosen key and
/// truncates to `limit`. The result distances are always finite.
pub fn find_nearby<T: GeoTagged>(
    origin: Coordinate,
    entities: Vec<T>,
    options: &NearbyOptions,
) -> Vec<Ranked<T>> {
    let candidates: Vec<T> = match &options.category {
        Some(wanted) => entities
            .into_iter()
            .filter(|e| e.category().is_some_and(|c| c.eq_ignore_ascii_case(wanted)))
            .collect(),
        None => entities,
    };
    let candidate_count = candidates.len();

    let mut ranked: Vec<Ranked<T>> = decorate_with_distances(origin, candidates)
        .into_iter()
        .filter(|(_, d)| *d <= options.max_distance_km)
        .map(|(entity, d)| Ranked { entity, distance_km: Some(d) })
        .collect();

    match options.sort_by {
        SortKey::Distance => {
            ranked.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortKey::Rating => {
            ranked.sort_by(|a, b| {
                b.entity
                    .rating()
                    .partial_cmp(&a.entity.rating())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortKey::Reviews => {
            ranked.sort_by_key(|r| Reverse(r.entity.review_count()));
        }
    }

    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }

    debug!(
        candidates = candidate_count,
        returned = ranked.len(),
        max_distance_km = options.max_distance_km,
        "ranked nearby listings"
    );

    ranked
}

/// Computes the distance for every candidate, preserving input order.
fn decorate_with_distances<T: GeoTagged>(origin: Coordinate, entities: Vec<T>) -> Vec<(T, f64)> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        entities
            .into_par_iter()
            .map(|e| {
                let d = entity_distance(origin, &e);
                (e, d)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        entities
            .into_iter()
            .map(|e| {
                let d = entity_distance(origin, &e);
                (e, d)
            })
            .collect()
    }
}
