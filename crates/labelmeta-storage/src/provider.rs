//! Collaborator traits consumed by the metadata services
//!
//! Implementations must be thread-safe (Send + Sync) for use in async
//! contexts; the tag engine calls them concurrently for many assets.

use async_trait::async_trait;
use labelmeta_core::Asset;

use crate::error::StorageResult;

/// Byte-level storage of named text blobs
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read a blob as text
    ///
    /// # Returns
    /// * `Ok(Some(text))` - The blob content
    /// * `Ok(None)` - The blob is missing and `throw_if_missing` is false
    /// * `Err(StorageError::NotFound)` - The blob is missing and `throw_if_missing` is true
    async fn read_text(&self, path: &str, throw_if_missing: bool) -> StorageResult<Option<String>>;

    /// Create or replace a blob
    async fn write_text(&self, path: &str, contents: &str) -> StorageResult<()>;

    /// Delete a blob; a missing blob is only an error when `ignore_missing` is false
    async fn delete_file(&self, path: &str, ignore_missing: bool) -> StorageResult<()>;
}

/// Ranged reads of asset content
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Read at most `len` leading bytes of the asset at `uri`
    async fn read_prefix(&self, uri: &str, len: usize) -> StorageResult<Vec<u8>>;
}

/// Enumeration of the assets in a folder
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// List every asset under `folder` (the root when `None`)
    async fn list_assets(&self, folder: Option<&str>) -> StorageResult<Vec<Asset>>;
}
