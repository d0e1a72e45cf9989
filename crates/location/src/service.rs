//! The location acquisition service.
//!
//! One instance is constructed per process scope and shared by
//! reference; there is no hidden global. The service owns the in-memory
//! snapshot and the durable store, and treats the position provider and
//! reverse geocoder as injected collaborators.

use crate::error::{LocationError, Result};
use crate::geocode::{PlaceInfo, ReverseGeocoder};
use crate::provider::{AcquireOptions, PermissionState, PositionError, PositionProvider};
use crate::snapshot::{LocationSnapshot, SNAPSHOT_TTL};
use crate::store::{SnapshotStore, USER_LOCATION_KEY};
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Acquires, geocodes and caches the caller's location.
pub struct LocationService<P, G> {
    provider: P,
    geocoder: G,
    store: SnapshotStore,
    current: Arc<RwLock<Option<LocationSnapshot>>>,
    watch_task: Mutex<Option<JoinHandle<()>>>,
}

impl<P, G> LocationService<P, G>
where
    P: PositionProvider,
    G: ReverseGeocoder,
{
    /// Creates a service over the given provider, geocoder and store.
    pub fn new(provider: P, geocoder: G, store: SnapshotStore) -> Self {
        Self {
            provider,
            geocoder,
            store,
            current: Arc::new(RwLock::new(None)),
            watch_task: Mutex::new(None),
        }
    }

    /// Current permission state, re-derived from the platform.
    pub fn check_permission(&self) -> PermissionState {
        self.provider.permission()
    }

    /// Acquires a fresh location.
    ///
    /// Races the provider against `options.timeout`, then reverse
    /// geocodes best-effort: a geocoding failure degrades to a
    /// coordinate-only snapshot, never to an error. Successful results
    /// are written to memory and the durable store.
    ///
    /// # Errors
    /// [`LocationError::PermissionDenied`],
    /// [`LocationError::PositionUnavailable`] or
    /// [`LocationError::Timeout`].
    #[instrument(skip(self))]
    pub async fn request_location(&self, options: AcquireOptions) -> Result<LocationSnapshot> {
        let raw = match tokio::time::timeout(
            options.timeout,
            self.provider.current_position(&options),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(PositionError::PermissionDenied)) => return Err(LocationError::PermissionDenied),
            Ok(Err(PositionError::Unavailable(reason))) => {
                return Err(LocationError::PositionUnavailable(reason));
            }
            Err(_) => return Err(LocationError::Timeout(options.timeout)),
        };

        debug!(
            latitude = raw.coordinate.latitude,
            longitude = raw.coordinate.longitude,
            accuracy_m = raw.accuracy_m,
            "position acquired"
        );

        let place = match self.geocoder.reverse_geocode(raw.coordinate).await {
            Ok(place) => place,
            Err(err) => {
                debug!(error = %err, "reverse geocoding unavailable, keeping coordinates only");
                PlaceInfo::default()
            }
        };

        let snapshot = LocationSnapshot::new(raw.coordinate, place);
        self.remember(&snapshot);
        Ok(snapshot)
    }

    /// Returns the cached location without triggering acquisition.
    ///
    /// Checks the in-memory snapshot first, then the durable store;
    /// entries older than one hour are treated as absent. Store failures
    /// are logged and reported as a miss.
    pub fn get_current_location(&self) -> Option<LocationSnapshot> {
        if let Ok(guard) = self.current.read() {
            if let Some(snapshot) = guard.as_ref() {
                if !snapshot.is_expired(SNAPSHOT_TTL) {
                    return Some(snapshot.clone());
                }
            }
        }

        match self.store.get(USER_LOCATION_KEY) {
            Ok(Some(snapshot)) => {
                if let Ok(mut guard) = self.current.write() {
                    *guard = Some(snapshot.clone());
                }
                Some(snapshot)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "snapshot store read failed, treating as miss");
                None
            }
        }
    }

    /// Forgets the stored location in memory and on disk.
    pub fn clear_stored_location(&self) {
        if let Ok(mut guard) = self.current.write() {
            *guard = None;
        }
        self.store.remove(USER_LOCATION_KEY);
        debug!("stored location cleared");
    }

    /// Starts continuous position updates.
    ///
    /// Each provider update becomes a coordinate-only snapshot (watch
    /// mode skips geocoding), replaces the in-memory snapshot and is
    /// handed to `callback`. A second call replaces any existing
    /// subscription rather than stacking a duplicate.
    pub fn start_watching<F>(&self, mut callback: F)
    where
        F: FnMut(LocationSnapshot) + Send + 'static,
    {
        let mut updates = self.provider.watch(&AcquireOptions::watch());
        let current = Arc::clone(&self.current);

        let handle = tokio::spawn(async move {
            while let Some(raw) = updates.recv().await {
                let snapshot = LocationSnapshot::coordinates_only(raw.coordinate);
                if let Ok(mut guard) = current.write() {
                    *guard = Some(snapshot.clone());
                }
                callback(snapshot);
            }
        });

        if let Ok(mut guard) = self.watch_task.lock() {
            if let Some(previous) = guard.replace(handle) {
                debug!("replacing existing location watch");
                previous.abort();
            }
        }
    }

    /// Stops continuous updates. A no-op when not watching.
    pub fn stop_watching(&self) {
        if let Ok(mut guard) = self.watch_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
                debug!("location watch stopped");
            }
        }
    }

    fn remember(&self, snapshot: &LocationSnapshot) {
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(snapshot.clone());
        }
        if let Err(err) = self.store.set(USER_LOCATION_KEY, snapshot) {
            warn!(error = %err, "snapshot store write failed, keeping in-memory copy only");
        }
    }
}

impl<P, G> Drop for LocationService<P, G> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.watch_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::GeocodeError;
    use crate::provider::RawPosition;
    use chrono::TimeDelta;
    use garilink_geo::Coordinate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    const CBD: Coordinate = Coordinate { latitude: -1.2921, longitude: 36.8219 };

    struct MockProvider {
        permission: PermissionState,
        response: std::result::Result<RawPosition, PositionError>,
        delay: Duration,
        watch_feed: Vec<RawPosition>,
    }

    impl MockProvider {
        fn with_fix(coordinate: Coordinate) -> Self {
            Self {
                permission: PermissionState::Granted,
                response: Ok(RawPosition { coordinate, accuracy_m: Some(12.0) }),
                delay: Duration::ZERO,
                watch_feed: Vec::new(),
            }
        }

        fn failing(error: PositionError) -> Self {
            Self {
                permission: PermissionState::Denied,
                response: Err(error),
                delay: Duration::ZERO,
                watch_feed: Vec::new(),
            }
        }
    }

    impl PositionProvider for MockProvider {
        fn permission(&self) -> PermissionState {
            self.permission
        }

        async fn current_position(
            &self,
            _options: &AcquireOptions,
        ) -> std::result::Result<RawPosition, PositionError> {
            tokio::time::sleep(self.delay).await;
            self.response.clone()
        }

        fn watch(&self, _options: &AcquireOptions) -> mpsc::Receiver<RawPosition> {
            let (tx, rx) = mpsc::channel(8);
            let feed = self.watch_feed.clone();
            tokio::spawn(async move {
                for raw in feed {
                    if tx.send(raw).await.is_err() {
                        break;
                    }
                }
            });
            rx
        }
    }

    enum MockGeocoder {
        Place(PlaceInfo),
        ServerError,
    }

    impl ReverseGeocoder for MockGeocoder {
        async fn reverse_geocode(
            &self,
            _coordinate: Coordinate,
        ) -> std::result::Result<PlaceInfo, GeocodeError> {
            match self {
                MockGeocoder::Place(place) => Ok(place.clone()),
                MockGeocoder::ServerError => Err(GeocodeError::Status(500)),
            }
        }
    }

    fn nairobi_place() -> PlaceInfo {
        PlaceInfo {
            city: Some("Nairobi".to_string()),
            state: Some("Nairobi County".to_string()),
            country: Some("Kenya".to_string()),
            formatted_address: Some("Nairobi, Nairobi County, Kenya".to_string()),
        }
    }

    fn service_in(
        temp: &TempDir,
        provider: MockProvider,
        geocoder: MockGeocoder,
    ) -> LocationService<MockProvider, MockGeocoder> {
        let store = SnapshotStore::open(temp.path()).unwrap();
        LocationService::new(provider, geocoder, store)
    }

    #[tokio::test]
    async fn test_request_location_merges_place() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::with_fix(CBD),
            MockGeocoder::Place(nairobi_place()),
        );

        let snapshot = service
            .request_location(AcquireOptions::default())
            .await
            .unwrap();

        assert_eq!(snapshot.coordinate, CBD);
        assert_eq!(snapshot.place.city.as_deref(), Some("Nairobi"));
    }

    #[tokio::test]
    async fn test_geocoding_failure_degrades_to_coordinates() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp, MockProvider::with_fix(CBD), MockGeocoder::ServerError);

        let snapshot = service
            .request_location(AcquireOptions::default())
            .await
            .unwrap();

        assert_eq!(snapshot.coordinate, CBD);
        assert!(snapshot.place.is_empty());
        // The degraded snapshot is still cached
        assert!(service.get_current_location().is_some());
    }

    #[tokio::test]
    async fn test_permission_denied_propagates() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::PermissionDenied),
            MockGeocoder::ServerError,
        );

        let err = service
            .request_location(AcquireOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_position_unavailable_propagates() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::Unavailable("no fix".to_string())),
            MockGeocoder::ServerError,
        );

        let err = service
            .request_location(AcquireOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::PositionUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_races_the_provider() {
        let temp = TempDir::new().unwrap();
        let mut provider = MockProvider::with_fix(CBD);
        provider.delay = Duration::from_secs(60);
        let service = service_in(&temp, provider, MockGeocoder::Place(nairobi_place()));

        let options = AcquireOptions::default();
        let err = service.request_location(options).await.unwrap_err();
        assert!(matches!(err, LocationError::Timeout(t) if t == options.timeout));
    }

    #[tokio::test]
    async fn test_get_current_location_never_acquires() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::Unavailable("down".to_string())),
            MockGeocoder::ServerError,
        );

        // A broken provider is irrelevant: the read path only looks at caches
        assert!(service.get_current_location().is_none());
    }

    #[tokio::test]
    async fn test_store_fallback_across_instances() {
        let temp = TempDir::new().unwrap();
        {
            let service = service_in(
                &temp,
                MockProvider::with_fix(CBD),
                MockGeocoder::Place(nairobi_place()),
            );
            service
                .request_location(AcquireOptions::default())
                .await
                .unwrap();
        }

        // Fresh instance, empty memory: falls back to the durable store
        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::Unavailable("down".to_string())),
            MockGeocoder::ServerError,
        );
        let snapshot = service.get_current_location().unwrap();
        assert_eq!(snapshot.coordinate, CBD);
    }

    #[tokio::test]
    async fn test_cache_expiry_boundary() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::open(temp.path()).unwrap();

        let mut snapshot = LocationSnapshot::coordinates_only(CBD);
        snapshot.timestamp = chrono::Utc::now() - TimeDelta::minutes(59);
        store.set(USER_LOCATION_KEY, &snapshot).unwrap();

        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::Unavailable("down".to_string())),
            MockGeocoder::ServerError,
        );
        assert!(service.get_current_location().is_some());

        let mut stale = LocationSnapshot::coordinates_only(CBD);
        stale.timestamp = chrono::Utc::now() - TimeDelta::minutes(61);
        store.set(USER_LOCATION_KEY, &stale).unwrap();
        service.clear_stored_location();
        store.set(USER_LOCATION_KEY, &stale).unwrap();

        assert!(service.get_current_location().is_none());
    }

    #[tokio::test]
    async fn test_clear_wipes_memory_and_store() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::with_fix(CBD),
            MockGeocoder::Place(nairobi_place()),
        );
        service
            .request_location(AcquireOptions::default())
            .await
            .unwrap();
        assert!(service.get_current_location().is_some());

        service.clear_stored_location();
        assert!(service.get_current_location().is_none());

        let store = SnapshotStore::open(temp.path()).unwrap();
        assert!(store.get(USER_LOCATION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_watch_delivers_updates() {
        let temp = TempDir::new().unwrap();
        let mut provider = MockProvider::with_fix(CBD);
        provider.watch_feed = vec![
            RawPosition { coordinate: CBD, accuracy_m: None },
            RawPosition {
                coordinate: Coordinate::new(-1.3031, 36.8331),
                accuracy_m: None,
            },
        ];
        let service = service_in(&temp, provider, MockGeocoder::ServerError);

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        service.start_watching(move |_snapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        // Watch updates refresh the in-memory snapshot
        let current = service.get_current_location().unwrap();
        assert_eq!(current.coordinate, Coordinate::new(-1.3031, 36.8331));

        service.stop_watching();
    }

    #[tokio::test]
    async fn test_stop_watching_when_not_watching_is_noop() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp, MockProvider::with_fix(CBD), MockGeocoder::ServerError);

        service.stop_watching();
        service.stop_watching();
    }

    #[tokio::test]
    async fn test_start_watching_replaces_subscription() {
        let temp = TempDir::new().unwrap();
        let mut provider = MockProvider::with_fix(CBD);
        provider.watch_feed = vec![RawPosition { coordinate: CBD, accuracy_m: None }];
        let service = service_in(&temp, provider, MockGeocoder::ServerError);

        let first = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&first);
        service.start_watching(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let second = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&second);
        service.start_watching(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        // The replacement subscription is the live one
        assert_eq!(second.load(Ordering::SeqCst), 1);

        service.stop_watching();
    }

    #[test]
    fn test_check_permission_passthrough() {
        let temp = TempDir::new().unwrap();
        let service = service_in(
            &temp,
            MockProvider::failing(PositionError::PermissionDenied),
            MockGeocoder::ServerError,
        );
        assert_eq!(service.check_permission(), PermissionState::Denied);
    }
}
