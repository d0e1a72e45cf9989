//! Distance tier bucketing for grouped presentation.

use crate::rank::Ranked;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A coarse distance bucket for grouped UI presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceTier {
    /// Under 5 km.
    Nearby,
    /// 5 to 15 km.
    Moderate,
    /// 15 km and beyond. Listings past the search radius are excluded
    /// upstream by the ranking filter, not here.
    Far,
}

impl DistanceTier {
    /// The tier for a computed distance.
    #[must_use]
    pub fn for_distance(km: f64) -> Self {
        if km < 5.0 {
            DistanceTier::Nearby
        } else if km < 15.0 {
            DistanceTier::Moderate
        } else {
            DistanceTier::Far
        }
    }
}

/// Ranked listings grouped by [`DistanceTier`].
#[derive(Debug, Clone, Serialize)]
pub struct TierBuckets<T> {
    /// Listings under 5 km.
    pub nearby: Vec<Ranked<T>>,
    /// Listings from 5 to 15 km.
    pub moderate: Vec<Ranked<T>>,
    /// Listings from 15 km.
    pub far: Vec<Ranked<T>>,
}

impl<T> Default for TierBuckets<T> {
    fn default() -> Self {
        Self {
            nearby: Vec::new(),
            moderate: Vec::new(),
            far: Vec::new(),
        }
    }
}

impl<T> TierBuckets<T> {
    /// Total number of bucketed listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nearby.len() + self.moderate.len() + self.far.len()
    }

    /// True when no listing was bucketed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups ranked listings into distance tiers in a single pass.
///
/// Each listing with a computed distance lands in exactly one bucket.
/// Listings with an unknown distance are skipped: bucketing them as
/// "nearby" would promote exactly the listings we know least about.
pub fn group_by_tier<T>(ranked: Vec<Ranked<T>>) -> TierBuckets<T> {
    let mut buckets = TierBuckets::default();
    let mut skipped = 0usize;

    for item in ranked {
        match item.distance_km {
            Some(km) => match DistanceTier::for_distance(km) {
                DistanceTier::Nearby => buckets.nearby.push(item),
                DistanceTier::Moderate => buckets.moderate.push(item),
                DistanceTier::Far => buckets.far.push(item),
            },
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "listings without computed distance left unbucketed");
    }

    buckets
}
