//! Location acquisition for GariLink.
//!
//! This crate bridges a platform position-sensing capability into the
//! marketplace: it acquires the caller's coordinate, reverse-geocodes it
//! to a human-readable place best-effort, and caches the result durably
//! with a one-hour time-to-live.
//!
//! The platform capability and the geocoding lookup are both injected
//! through traits ([`PositionProvider`], [`ReverseGeocoder`]) so the
//! service can be driven by mocks in tests and by whatever the embedding
//! process has available in production.
//!
//! # Example
//!
//! ```rust,no_run
//! use garilink_location::{
//!     AcquireOptions, HttpReverseGeocoder, LocationService, SnapshotStore,
//! };
//! # use garilink_location::{PositionProvider, PermissionState, RawPosition, PositionError, AcquireOptions as O};
//! # struct Gps;
//! # impl PositionProvider for Gps {
//! #     fn permission(&self) -> PermissionState { PermissionState::Granted }
//! #     async fn current_position(&self, _: &O) -> Result<RawPosition, PositionError> { unimplemented!() }
//! #     fn watch(&self, _: &O) -> tokio::sync::mpsc::Receiver<RawPosition> { unimplemented!() }
//! # }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let service = LocationService::new(
//!     Gps,
//!     HttpReverseGeocoder::from_env()?,
//!     SnapshotStore::open_default()?,
//! );
//!
//! let snapshot = service.request_location(AcquireOptions::default()).await?;
//! println!("{} ({:?})", snapshot.coordinate.latitude, snapshot.place.city);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod geocode;
mod provider;
mod service;
mod snapshot;
mod store;

pub use error::{LocationError, LocationErrorCode, Result};
pub use geocode::{GeocodeError, GeocoderConfig, HttpReverseGeocoder, PlaceInfo, ReverseGeocoder};
pub use provider::{AcquireOptions, PermissionState, PositionError, PositionProvider, RawPosition};
pub use service::LocationService;
pub use snapshot::{LocationSnapshot, SNAPSHOT_TTL};
pub use store::{SnapshotStore, StoreError, USER_LOCATION_KEY};
