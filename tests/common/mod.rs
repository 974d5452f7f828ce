//! Common test utilities and helpers
//!
//! A [`TestProject`] is a temporary project directory with every metadata
//! service wired to it through the local file backend.

#![allow(dead_code)]

use labelmeta_service::{
    AssetIdentity, DefaultAssetIdentity, FolderAssetProvider, MetadataConfig, MetadataServices,
    RecordingNotifier,
};
use labelmeta_storage::LocalFileStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub mod fixtures;

/// Temporary project directory with services attached
pub struct TestProject {
    dir: TempDir,
    pub services: MetadataServices,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestProject {
    /// Create an empty project
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = LocalFileStorage::new(dir.path());
        let notifier = Arc::new(RecordingNotifier::new());
        let identity: Arc<dyn AssetIdentity> = Arc::new(DefaultAssetIdentity::new(
            Arc::new(storage.clone()),
            notifier.clone(),
        ));
        let provider = Arc::new(FolderAssetProvider::new(storage.clone(), identity.clone()));

        let storage = Arc::new(storage);
        let services = MetadataServices::builder()
            .storage(storage.clone())
            .reader(storage)
            .provider(provider)
            .identity(identity)
            .notifier(notifier.clone())
            .config(MetadataConfig::default())
            .build()
            .expect("Failed to build services");

        Self {
            dir,
            services,
            notifier,
        }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a project file
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file, creating parent folders
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create folder");
        }
        std::fs::write(path, contents).expect("Failed to write file");
    }

    /// Read a project file as text
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("Failed to read file")
    }

    /// Check if a project file exists
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

/// Give spawned notice tasks a chance to run
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
