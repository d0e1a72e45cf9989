//! The acquired-location value type.

use crate::geocode::PlaceInfo;
use chrono::{DateTime, Utc};
use garilink_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time-to-live of a stored snapshot: exactly one hour.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(3600);

/// A successfully acquired location with optional place information.
///
/// Created on acquisition, cached with [`SNAPSHOT_TTL`], discarded on
/// read once expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    /// The acquired coordinate.
    pub coordinate: Coordinate,
    /// Best-effort reverse-geocoded place; empty when geocoding failed.
    #[serde(flatten)]
    pub place: PlaceInfo,
    /// Acquisition time.
    pub timestamp: DateTime<Utc>,
}

impl LocationSnapshot {
    /// Creates a snapshot timestamped now.
    #[must_use]
    pub fn new(coordinate: Coordinate, place: PlaceInfo) -> Self {
        Self {
            coordinate,
            place,
            timestamp: Utc::now(),
        }
    }

    /// Creates a coordinate-only snapshot (no place information).
    #[must_use]
    pub fn coordinates_only(coordinate: Coordinate) -> Self {
        Self::new(coordinate, PlaceInfo::default())
    }

    /// Age of this snapshot relative to now.
    ///
    /// A snapshot timestamped in the future (clock skew) has age zero.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether this snapshot is older than the given time-to-live.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}
