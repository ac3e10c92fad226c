//! Audio asset storage for Witness.
//!
//! Recordings point at audio files through `file://` URIs. This module
//! provides the trait the deletion and playback paths use to check and
//! remove those on-disk assets, with a filesystem implementation and an
//! in-memory one for tests.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{WitnessError, WitnessResult};

/// Trait for audio asset store implementations.
pub trait AssetStore: Send + Sync {
    /// Check whether the asset behind `uri` is present
    fn exists(&self, uri: &str) -> impl Future<Output = WitnessResult<bool>> + Send;

    /// Remove the asset behind `uri`. Removing an absent asset is not an error.
    fn remove(&self, uri: &str) -> impl Future<Output = WitnessResult<()>> + Send;
}

impl<T: AssetStore> AssetStore for std::sync::Arc<T> {
    async fn exists(&self, uri: &str) -> WitnessResult<bool> {
        (**self).exists(uri).await
    }

    async fn remove(&self, uri: &str) -> WitnessResult<()> {
        (**self).remove(uri).await
    }
}

/// Resolve a recording URI to a local filesystem path
pub fn local_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

/// Asset store backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsAssetStore;

impl FsAssetStore {
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for FsAssetStore {
    async fn exists(&self, uri: &str) -> WitnessResult<bool> {
        Ok(tokio::fs::try_exists(local_path(uri)).await.unwrap_or(false))
    }

    async fn remove(&self, uri: &str) -> WitnessResult<()> {
        match tokio::fs::remove_file(local_path(uri)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WitnessError::storage(format!(
                "failed to remove asset '{}': {}",
                uri, err
            ))),
        }
    }
}

/// In-memory asset store for tests: a set of URIs that "exist".
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    uris: RwLock<HashSet<String>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset as present
    pub fn insert(&self, uri: impl Into<String>) {
        self.uris.write().unwrap().insert(uri.into());
    }

    /// Synchronous presence check for test assertions
    pub fn contains(&self, uri: &str) -> bool {
        self.uris.read().unwrap().contains(uri)
    }
}

impl AssetStore for MemoryAssetStore {
    async fn exists(&self, uri: &str) -> WitnessResult<bool> {
        Ok(self.contains(uri))
    }

    async fn remove(&self, uri: &str) -> WitnessResult<()> {
        self.uris.write().unwrap().remove(uri);
        Ok(())
    }
}
