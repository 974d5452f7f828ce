//! Service layer for label metadata
//!
//! This crate sits between the storage backends and the callers (the CLI,
//! or an embedding application). It resolves asset identities, loads and
//! saves per-asset metadata, validates label documents and keeps tags
//! consistent across a project.
//!
//! # Architecture
//!
//! - **AssetIdentity**: path normalization, asset ids and format sniffing
//! - **MetadataStore**: load/save of label and generator documents
//! - **LabelValidator**: structural checks on label documents
//! - **TagConsistencyEngine**: project-wide tag rename/delete/update
//! - **AssetCatalog**: supported assets directly inside a folder
//!
//! # Example
//!
//! ```rust,no_run
//! use labelmeta_service::{MetadataServices, TagOperation};
//! use labelmeta_storage::InMemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> labelmeta_service::ServiceResult<()> {
//! let storage = Arc::new(InMemoryStorage::new());
//! let services = MetadataServices::builder()
//!     .storage(storage.clone())
//!     .reader(storage.clone())
//!     .provider(storage)
//!     .build()
//!     .map_err(labelmeta_service::ServiceError::Internal)?;
//!
//! let assets = services.catalog.list_assets(None).await?;
//! for metadata in services.tags.update_assets(&assets, &TagOperation::delete("Person")).await? {
//!     services.store.save(metadata).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod notifier;
pub mod store;
pub mod tag;
pub mod validation;

pub use catalog::{AssetCatalog, FolderAssetProvider};
pub use config::MetadataConfig;
pub use error::{ServiceError, ServiceResult};
pub use identity::{AssetIdentity, DefaultAssetIdentity};
pub use notifier::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use store::{DefaultMetadataStore, MetadataStore};
pub use tag::{TagConsistencyEngine, TagFields, TagOperation};
pub use validation::LabelValidator;

use labelmeta_storage::{AssetProvider, ContentReader, StorageProvider};
use std::sync::Arc;

/// All metadata services wired to one set of backends
#[derive(Clone)]
pub struct MetadataServices {
    pub identity: Arc<dyn AssetIdentity>,
    pub store: Arc<dyn MetadataStore>,
    pub tags: Arc<TagConsistencyEngine>,
    pub catalog: Arc<AssetCatalog>,
    pub notifier: Arc<dyn Notifier>,
}

impl MetadataServices {
    /// Wire the default implementations
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        reader: Arc<dyn ContentReader>,
        provider: Arc<dyn AssetProvider>,
        notifier: Arc<dyn Notifier>,
        config: MetadataConfig,
    ) -> Self {
        let identity = Arc::new(DefaultAssetIdentity::new(reader, notifier.clone()));
        let store: Arc<dyn MetadataStore> =
            Arc::new(DefaultMetadataStore::new(storage, notifier.clone(), config));
        Self::with_services(
            identity,
            store,
            Arc::new(AssetCatalog::new(provider)),
            notifier,
        )
    }

    /// Assemble from custom implementations
    pub fn with_services(
        identity: Arc<dyn AssetIdentity>,
        store: Arc<dyn MetadataStore>,
        catalog: Arc<AssetCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tags = Arc::new(TagConsistencyEngine::new(store.clone()));
        Self {
            identity,
            store,
            tags,
            catalog,
            notifier,
        }
    }

    pub fn builder() -> MetadataServicesBuilder {
        MetadataServicesBuilder::new()
    }
}

/// Builder for MetadataServices
#[derive(Default)]
pub struct MetadataServicesBuilder {
    storage: Option<Arc<dyn StorageProvider>>,
    reader: Option<Arc<dyn ContentReader>>,
    provider: Option<Arc<dyn AssetProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
    identity: Option<Arc<dyn AssetIdentity>>,
    store: Option<Arc<dyn MetadataStore>>,
    config: MetadataConfig,
}

impl MetadataServicesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document storage
    pub fn storage(mut self, storage: Arc<dyn StorageProvider>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the asset content reader
    pub fn reader(mut self, reader: Arc<dyn ContentReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Set the asset listing provider
    pub fn provider(mut self, provider: Arc<dyn AssetProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the notifier, [`TracingNotifier`] otherwise
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set a custom identity resolver
    pub fn identity(mut self, identity: Arc<dyn AssetIdentity>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set a custom metadata store
    pub fn store(mut self, store: Arc<dyn MetadataStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: MetadataConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the services
    ///
    /// # Errors
    ///
    /// Returns an error if a backend needed by a default implementation was
    /// not set.
    pub fn build(self) -> Result<MetadataServices, String> {
        let provider = self.provider.ok_or("Asset provider is required")?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));

        let identity: Arc<dyn AssetIdentity> = match self.identity {
            Some(identity) => identity,
            None => {
                let reader = self.reader.ok_or("Content reader is required")?;
                Arc::new(DefaultAssetIdentity::new(reader, notifier.clone()))
            }
        };

        let store: Arc<dyn MetadataStore> = match self.store {
            Some(store) => store,
            None => {
                let storage = self.storage.ok_or("Storage is required")?;
                Arc::new(DefaultMetadataStore::new(
                    storage,
                    notifier.clone(),
                    self.config,
                ))
            }
        };

        Ok(MetadataServices::with_services(
            identity,
            store,
            Arc::new(AssetCatalog::new(provider)),
            notifier,
        ))
    }
}
