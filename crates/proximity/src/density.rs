//! Service density statistics around a user location.

use crate::entity::GeoTagged;
use crate::rank::{find_nearby, NearbyOptions};
use garilink_geo::Coordinate;
use serde::Serialize;
use std::collections::HashMap;

/// Default radius for density statistics.
pub const DEFAULT_DENSITY_RADIUS_KM: f64 = 10.0;

/// Category key for listings without a category.
const UNCATEGORIZED: &str = "uncategorized";

/// Aggregate statistics over the listings within a radius.
#[derive(Debug, Clone, Serialize)]
pub struct DensityReport {
    /// Number of listings within the radius.
    pub total_count: usize,
    /// Listings per category.
    pub count_by_category: HashMap<String, usize>,
    /// Arithmetic mean of the distances; `0.0` for an empty set, never NaN.
    pub average_distance_km: f64,
}

/// Computes listing density around a user coordinate.
///
/// Reuses [`find_nearby`] with the radius as `max_distance_km` and no
/// truncation, so the usual missing-coordinate rules apply.
pub fn service_density<T: GeoTagged>(
    origin: Coordinate,
    entities: Vec<T>,
    radius_km: f64,
) -> DensityReport {
    let ranked = find_nearby(origin, entities, &NearbyOptions::within_radius(radius_km));

    let total_count = ranked.len();
    let mut count_by_category: HashMap<String, usize> = HashMap::new();
    let mut distance_sum = 0.0;

    for item in &ranked {
        let category = item.entity.category().unwrap_or(UNCATEGORIZED);
        *count_by_category.entry(category.to_string()).or_insert(0) += 1;
        distance_sum += item.distance_km.unwrap_or(0.0);
    }

    #[allow(clippy::cast_precision_loss)]
    let average_distance_km = if total_count == 0 {
        0.0
    } else {
        distance_sum / total_count as f64
    };

    DensityReport {
        total_count,
        count_by_category,
        average_distance_km,
    }
}
