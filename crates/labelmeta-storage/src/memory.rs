//! In-process storage backend
//!
//! Keeps text blobs, raw asset content and the asset listing in maps behind
//! async locks. Used by tests and by embedders that manage persistence
//! themselves.

use async_trait::async_trait;
use labelmeta_core::Asset;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::provider::{AssetProvider, ContentReader, StorageProvider};

/// Map-backed implementation of every storage collaborator
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    files: RwLock<BTreeMap<String, String>>,
    content: RwLock<BTreeMap<String, Vec<u8>>>,
    assets: RwLock<Vec<Asset>>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a text blob
    pub async fn insert_file(&self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.write().await.insert(path.into(), contents.into());
    }

    /// Seed the raw bytes behind an asset URI
    pub async fn insert_content(&self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.content.write().await.insert(uri.into(), bytes.into());
    }

    /// Add an asset to the listing
    pub async fn insert_asset(&self, asset: Asset) {
        self.assets.write().await.push(asset);
    }

    /// Current content of a text blob
    pub async fn file(&self, path: &str) -> Option<String> {
        self.files.read().await.get(path).cloned()
    }

    /// Check if a text blob exists
    pub async fn contains(&self, path: &str) -> bool {
        self.files.read().await.contains_key(path)
    }

    /// Names of all stored text blobs, sorted
    pub async fn file_names(&self) -> Vec<String> {
        self.files.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorage {
    async fn read_text(&self, path: &str, throw_if_missing: bool) -> StorageResult<Option<String>> {
        match self.files.read().await.get(path) {
            Some(text) => Ok(Some(text.clone())),
            None if throw_if_missing => Err(StorageError::NotFound(path.to_string())),
            None => Ok(None),
        }
    }

    async fn write_text(&self, path: &str, contents: &str) -> StorageResult<()> {
        debug!(path, bytes = contents.len(), "Writing blob");
        self.files
            .write()
            .await
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }

    async fn delete_file(&self, path: &str, ignore_missing: bool) -> StorageResult<()> {
        let removed = self.files.write().await.remove(path);
        if removed.is_none() && !ignore_missing {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentReader for InMemoryStorage {
    async fn read_prefix(&self, uri: &str, len: usize) -> StorageResult<Vec<u8>> {
        let content = self.content.read().await;
        let bytes = content
            .get(uri)
            .ok_or_else(|| StorageError::NotFound(uri.to_string()))?;
        Ok(bytes.iter().take(len).copied().collect())
    }
}

#[async_trait]
impl AssetProvider for InMemoryStorage {
    async fn list_assets(&self, _folder: Option<&str>) -> StorageResult<Vec<Asset>> {
        Ok(self.assets.read().await.clone())
    }
}
