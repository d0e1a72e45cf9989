//! Durable snapshot cache.
//!
//! A small file-based key-value store holding serialized
//! [`LocationSnapshot`]s. Entries carry a sha256 integrity hash and
//! expire [`SNAPSHOT_TTL`] after the snapshot's acquisition timestamp;
//! an expired or corrupted entry is removed on read and reported as
//! absent.

use crate::snapshot::{LocationSnapshot, SNAPSHOT_TTL};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Fixed key under which the user's location snapshot is stored.
pub const USER_LOCATION_KEY: &str = "user_location";

/// Failures reading or writing the durable cache.
///
/// The service treats every variant as a cache miss; these surface only
/// to code driving the store directly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Entry metadata persisted alongside the snapshot data.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    /// Snapshot acquisition time, unix milliseconds.
    created_at_ms: i64,
    /// Expiry time, unix milliseconds.
    expires_at_ms: i64,
    /// Hash of the serialized snapshot for integrity.
    hash: String,
}

/// File-backed store for location snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Opens a store rooted at the given directory, creating it if needed.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the per-user default store under the platform cache directory.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directory cannot be created.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("garilink");
        Self::open(dir)
    }

    /// Reads a snapshot, enforcing expiry and integrity.
    ///
    /// Expired and corrupted entries are removed and reported as `None`.
    ///
    /// # Errors
    /// [`StoreError`] on filesystem or deserialization failure.
    pub fn get(&self, key: &str) -> Result<Option<LocationSnapshot>, StoreError> {
        let meta_path = self.meta_path(key);
        let data_path = self.data_path(key);

        if !meta_path.exists() || !data_path.exists() {
            return Ok(None);
        }

        let meta: EntryMeta = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;

        if chrono::Utc::now().timestamp_millis() > meta.expires_at_ms {
            self.discard(key);
            return Ok(None);
        }

        let data = fs::read(&data_path)?;
        if hash_data(&data) != meta.hash {
            self.discard(key);
            return Ok(None);
        }

        let snapshot: LocationSnapshot = serde_json::from_slice(&data)?;
        Ok(Some(snapshot))
    }

    /// Writes a snapshot. Expiry is derived from the snapshot's own
    /// acquisition timestamp, not the write time.
    ///
    /// # Errors
    /// [`StoreError`] on filesystem or serialization failure.
    pub fn set(&self, key: &str, snapshot: &LocationSnapshot) -> Result<(), StoreError> {
        let data = serde_json::to_vec(snapshot)?;
        let created_at_ms = snapshot.timestamp.timestamp_millis();

        #[allow(clippy::cast_possible_wrap)]
        let ttl_ms = SNAPSHOT_TTL.as_millis() as i64;
        let meta = EntryMeta {
            created_at_ms,
            expires_at_ms: created_at_ms + ttl_ms,
            hash: hash_data(&data),
        };

        fs::write(self.meta_path(key), serde_json::to_string(&meta)?)?;
        fs::write(self.data_path(key), &data)?;
        Ok(())
    }

    /// Removes a snapshot. Missing entries are a no-op.
    pub fn remove(&self, key: &str) {
        self.discard(key);
    }

    fn discard(&self, key: &str) {
        let _ = fs::remove_file(self.meta_path(key));
        let _ = fs::remove_file(self.data_path(key));
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.meta", hash_key(key)))
    }

    fn data_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.data", hash_key(key)))
    }
}

fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
