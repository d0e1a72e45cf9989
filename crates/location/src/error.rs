//! Error types for location acquisition.
//!
//! Only acquisition failures surface to callers. Reverse-geocoding and
//! cache failures degrade gracefully inside the service and never reach
//! this enum; the caller's only recourse for what remains is manual
//! location entry or a retry.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;

/// Errors surfaced by [`crate::LocationService::request_location`].
#[derive(Debug, Error)]
pub enum LocationError {
    /// The user declined location access. Recoverable by manual entry.
    #[error("location permission denied")]
    PermissionDenied,

    /// The platform could not resolve a position. Recoverable by retry.
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    /// No platform response within the configured window.
    #[error("location request timed out after {0:?}")]
    Timeout(Duration),
}

/// Error code for integration with GariLink error handling.
/// Range: 11xxx for location errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorCode {
    /// The user declined location access
    PermissionDenied = 11001,
    /// The platform could not resolve a position
    PositionUnavailable = 11002,
    /// Acquisition timed out
    Timeout = 11003,
}

impl LocationError {
    /// Returns the error code for this error.
    #[must_use]
    pub fn code(&self) -> LocationErrorCode {
        match self {
            LocationError::PermissionDenied => LocationErrorCode::PermissionDenied,
            LocationError::PositionUnavailable(_) => LocationErrorCode::PositionUnavailable,
            LocationError::Timeout(_) => LocationErrorCode::Timeout,
        }
    }

    /// Whether a retry (possibly with backoff) can reasonably succeed.
    ///
    /// `PermissionDenied` requires user action, not a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            LocationError::PermissionDenied => false,
            LocationError::PositionUnavailable(_) | LocationError::Timeout(_) => true,
        }
    }
}
