//! Local filesystem storage backend
//!
//! Blob names are relative, `/`-separated paths under a root directory.
//! Names that would escape the root are rejected.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageResult};
use crate::provider::{ContentReader, StorageProvider};

/// `tokio::fs` backend rooted at a directory
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a blob name to a path under the root
    pub fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(name.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Relative names of every regular file under `folder`, sorted
    ///
    /// Names use `/` separators regardless of platform.
    #[instrument(skip(self))]
    pub async fn list_files(&self, folder: Option<&str>) -> StorageResult<Vec<String>> {
        let start = match folder {
            Some(f) if !f.is_empty() => self.resolve(f)?,
            _ => self.root.clone(),
        };

        let mut names = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let display = dir.display().to_string();
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| StorageError::from_io(display.clone(), e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::from_io(display.clone(), e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StorageError::from_io(display.clone(), e))?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        let parts: Vec<String> = relative
                            .components()
                            .map(|c| c.as_os_str().to_string_lossy().into_owned())
                            .collect();
                        names.push(parts.join("/"));
                    }
                }
            }
        }

        names.sort();
        debug!(count = names.len(), "Listed files");
        Ok(names)
    }

    /// Size of a file in bytes
    pub async fn file_size(&self, name: &str) -> StorageResult<u64> {
        let path = self.resolve(name)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| StorageError::from_io(name, e))?;
        Ok(metadata.len())
    }

    /// Map a `file:` URI to a local path
    fn path_from_uri(uri: &str) -> StorageResult<PathBuf> {
        let rest = uri
            .strip_prefix("file:")
            .or_else(|| uri.strip_prefix("FILE:"))
            .ok_or_else(|| StorageError::Unsupported(uri.to_string()))?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let decoded = urlencoding::decode(rest)
            .map_err(|e| StorageError::InvalidPath(format!("{}: {}", uri, e)))?;
        Ok(PathBuf::from(decoded.into_owned()))
    }
}

#[async_trait]
impl StorageProvider for LocalFileStorage {
    async fn read_text(&self, path: &str, throw_if_missing: bool) -> StorageResult<Option<String>> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(Some(text)),
            Err(e) => match StorageError::from_io(path, e) {
                StorageError::NotFound(_) if !throw_if_missing => Ok(None),
                err => Err(err),
            },
        }
    }

    async fn write_text(&self, path: &str, contents: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io(path, e))?;
        }
        tokio::fs::write(&full, contents)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        debug!(path, bytes = contents.len(), "Wrote file");
        Ok(())
    }

    async fn delete_file(&self, path: &str, ignore_missing: bool) -> StorageResult<()> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) => match StorageError::from_io(path, e) {
                StorageError::NotFound(_) if ignore_missing => Ok(()),
                err => Err(err),
            },
        }
    }
}

#[async_trait]
impl ContentReader for LocalFileStorage {
    async fn read_prefix(&self, uri: &str, len: usize) -> StorageResult<Vec<u8>> {
        let path = Self::path_from_uri(uri)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| StorageError::from_io(uri, e))?;
        let mut buf = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| StorageError::from_io(uri, e))?;
        Ok(buf)
    }
}
