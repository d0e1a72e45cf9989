//! Platform position provider abstraction.
//!
//! The actual sensing capability (browser geolocation relayed by the web
//! tier, a mobile GPS bridge, an IP lookup) is injected behind
//! [`PositionProvider`] so the service and its tests never touch a real
//! platform API.

use garilink_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::Receiver;

/// Whether the caller may acquire location.
///
/// Never persisted; re-derived from the platform on each check. A
/// platform without permission introspection must report `Prompt`, never
/// assume `Granted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Access granted; acquisition should succeed without a prompt.
    Granted,
    /// Access denied; acquisition will fail until the user intervenes.
    Denied,
    /// Undetermined; the platform will prompt on first acquisition.
    Prompt,
}

/// A position as yielded by the platform, before geocoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    /// The sensed coordinate.
    pub coordinate: Coordinate,
    /// Reported accuracy radius in meters, when the platform knows it.
    pub accuracy_m: Option<f64>,
}

/// Failures reported by a [`PositionProvider`].
///
/// Timeouts are not represented here: the service races the provider
/// call against its own deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// The user declined the platform prompt.
    PermissionDenied,
    /// The platform could not produce a fix.
    Unavailable(String),
}

/// Tuning for a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Deadline for the whole acquisition.
    pub timeout: Duration,
    /// Maximum age of a platform-cached fix the provider may serve.
    pub max_cache_age: Duration,
    /// Request a high-accuracy fix (more battery, slower).
    pub high_accuracy: bool,
}

impl AcquireOptions {
    /// One-shot acquisition: 10 s deadline, 5 min platform cache, high accuracy.
    #[must_use]
    pub fn one_shot() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_cache_age: Duration::from_secs(300),
            high_accuracy: true,
        }
    }

    /// Continuous watching: longer tolerances, lower accuracy.
    #[must_use]
    pub fn watch() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_cache_age: Duration::from_secs(600),
            high_accuracy: false,
        }
    }
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self::one_shot()
    }
}

/// Injected platform position-sensing capability.
#[allow(async_fn_in_trait)]
pub trait PositionProvider: Send + Sync + 'static {
    /// Current permission state, re-derived from the platform.
    fn permission(&self) -> PermissionState;

    /// Resolves one position fix.
    ///
    /// The service applies its own deadline on top; implementations may
    /// take as long as the platform does.
    ///
    /// # Errors
    /// [`PositionError::PermissionDenied`] when the user declines,
    /// [`PositionError::Unavailable`] when no fix can be produced.
    async fn current_position(
        &self,
        options: &AcquireOptions,
    ) -> std::result::Result<RawPosition, PositionError>;

    /// Opens a stream of position updates.
    ///
    /// The subscription ends when the receiver is dropped.
    fn watch(&self, options: &AcquireOptions) -> Receiver<RawPosition>;
}
