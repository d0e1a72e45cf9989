//! Human-readable distance and travel-time rendering.
//!
//! These are the display helpers the web tier uses on listing cards, so
//! the exact output shapes ("750m", "4.3km", "30 min", "2h 15m") are part
//! of the contract.

use serde::{Deserialize, Serialize};

/// Travel mode used for time estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Urban driving, assumed 40 km/h average.
    Driving,
    /// Walking, assumed 5 km/h average.
    Walking,
}

impl TravelMode {
    /// Assumed average speed for this mode in km/h.
    #[inline]
    #[must_use]
    pub fn speed_kmh(self) -> f64 {
        match self {
            TravelMode::Driving => 40.0,
            TravelMode::Walking => 5.0,
        }
    }
}

/// Formats a distance in kilometers for display.
///
/// Below 1 km the distance is rendered in whole meters; at or above 1 km
/// it is rendered with one decimal place and a "km" suffix.
///
/// # Example
/// ```
/// use garilink_geo::format_distance;
///
/// assert_eq!(format_distance(0.75), "750m");
/// assert_eq!(format_distance(4.32), "4.3km");
/// ```
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meters = (km * 1000.0).round() as u64;
        format!("{meters}m")
    } else {
        format!("{km:.1}km")
    }
}

/// Estimates travel time for a distance and renders it for display.
///
/// Minutes are rounded to the nearest whole minute. Under an hour the
/// result is "`N` min"; from an hour up it is "`H`h `M`m", dropping the
/// minutes component when it is zero.
///
/// # Example
/// ```
/// use garilink_geo::{estimate_travel_time, TravelMode};
///
/// assert_eq!(estimate_travel_time(20.0, TravelMode::Driving), "30 min");
/// assert_eq!(estimate_travel_time(90.0, TravelMode::Driving), "2h 15m");
/// ```
#[must_use]
pub fn estimate_travel_time(km: f64, mode: TravelMode) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = (km / mode.speed_kmh() * 60.0).round() as u64;

    if minutes < 60 {
        format!("{minutes} min")
    } else {
        let hours = minutes / 60;
        let rem = minutes % 60;
        if rem == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {rem}m")
        }
    }
}
