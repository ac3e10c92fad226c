//! Recording repository for Witness.
//!
//! Owns the canonical list of audio recordings and mediates every read and
//! write against the persistent store. The collection is kept
//! most-recent-first: `add` prepends, and every mutation persists the full
//! collection snapshot back under the `recordings` key before returning.
//!
//! Mutations hold the collection's write lock across the persist await, so
//! two rapid read-modify-write operations cannot start from the same stale
//! snapshot. Persist failures propagate as `WitnessError::Storage`; the
//! in-memory mutation is kept so the UI stays coherent with what the user
//! did, and the caller decides whether to warn that the change may not have
//! been written.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::error::WitnessResult;
use crate::models::Recording;
use crate::store::KeyValueStore;

/// Storage key holding the serialized recording collection
pub const RECORDINGS_KEY: &str = "recordings";

/// Partial update applied by the rename flow
#[derive(Debug, Clone, Default)]
pub struct RecordingUpdate {
    /// New user-supplied label; `None` leaves the current one in place
    pub custom_name: Option<String>,
}

/// Repository owning the recording collection.
pub struct RecordingRepository<S> {
    store: Arc<S>,
    recordings: RwLock<Vec<Recording>>,
    changes: watch::Sender<Vec<Recording>>,
}

impl<S: KeyValueStore> RecordingRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            store,
            recordings: RwLock::new(Vec::new()),
            changes,
        }
    }

    /// Load the collection from storage, rehydrating timestamps.
    ///
    /// Fails open: a missing key, a storage error, or unparseable JSON all
    /// yield an empty collection (logged), never a partially populated one.
    pub async fn load(&self) {
        let loaded = match self.store.get(RECORDINGS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Recording>>(&raw) {
                Ok(recordings) => recordings,
                Err(err) => {
                    warn!("Load recordings error: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Load recordings error: {}", err);
                Vec::new()
            }
        };

        let mut recordings = self.recordings.write().await;
        *recordings = loaded;
        self.changes.send_replace(recordings.clone());
        debug!(count = recordings.len(), "loaded recordings");
    }

    /// Snapshot of the collection, most recent first
    pub async fn list(&self) -> Vec<Recording> {
        self.recordings.read().await.clone()
    }

    /// Look up a single recording by ID
    pub async fn get(&self, id: &str) -> Option<Recording> {
        self.recordings
            .read()
            .await
            .iter()
            .find(|rec| rec.id == id)
            .cloned()
    }

    /// Subscribe to collection changes; receivers see a fresh snapshot
    /// after every mutation without reloading from storage.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Recording>> {
        self.changes.subscribe()
    }

    /// Prepend a new recording and persist.
    ///
    /// The newly added recording is guaranteed first in iteration order.
    pub async fn add(&self, recording: Recording) -> WitnessResult<()> {
        let mut recordings = self.recordings.write().await;
        recordings.insert(0, recording);
        self.changes.send_replace(recordings.clone());
        self.persist(&recordings).await
    }

    /// Merge a partial update into the matching recording and persist.
    ///
    /// An unknown ID is a logged no-op that still persists the unchanged
    /// collection, matching the legacy behavior callers rely on.
    pub async fn update(&self, id: &str, update: RecordingUpdate) -> WitnessResult<()> {
        let mut recordings = self.recordings.write().await;
        match recordings.iter_mut().find(|rec| rec.id == id) {
            Some(rec) => {
                if let Some(name) = update.custom_name {
                    rec.custom_name = Some(name);
                }
            }
            None => warn!(id, "update for unknown recording"),
        }
        self.changes.send_replace(recordings.clone());
        self.persist(&recordings).await
    }

    /// Remove the entry with the given ID and persist.
    ///
    /// Entry-only: the on-disk asset and the cross-collection reference
    /// check are orchestrated by the caller (see `WitnessClient`).
    pub async fn delete(&self, id: &str) -> WitnessResult<()> {
        let mut recordings = self.recordings.write().await;
        recordings.retain(|rec| rec.id != id);
        self.changes.send_replace(recordings.clone());
        self.persist(&recordings).await
    }

    /// Replace the whole collection in one persisted write.
    ///
    /// Used by multi-select delete and the settings clear-all path.
    pub async fn set_all(&self, replacement: Vec<Recording>) -> WitnessResult<()> {
        let mut recordings = self.recordings.write().await;
        *recordings = replacement;
        self.changes.send_replace(recordings.clone());
        self.persist(&recordings).await
    }

    async fn persist(&self, recordings: &[Recording]) -> WitnessResult<()> {
        let json = serde_json::to_string(recordings)?;
        self.store.set(RECORDINGS_KEY, &json).await.map_err(|err| {
            tracing::error!("Save recordings error: {}", err);
            err
        })
    }
}
