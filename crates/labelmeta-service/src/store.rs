//! Metadata load/save pipeline
//!
//! Each asset owns two documents next to it, named after its decoded name:
//! the label document and the generator document. [`MetadataStore::load`]
//! merges both into a fresh [`AssetMetadata`] on every call; nothing is
//! cached. Broken documents never fail a load: the problem is reported
//! through the notifier and the affected part falls back to empty (label
//! validation failures), absent (unparseable label JSON) or default
//! (invalid generator document) data.

use async_trait::async_trait;
use labelmeta_core::path::{decode_name, redirect_to_prefix};
use labelmeta_core::{
    to_stable_json, Asset, AssetMetadata, AssetState, GeneratorDocument, LabelData,
    MetadataError,
};
use labelmeta_storage::StorageProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::MetadataConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::notifier::Notifier;
use crate::validation::LabelValidator;

/// Trait for metadata persistence operations
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Load and validate the metadata of an asset
    async fn load(&self, asset: &Asset) -> ServiceResult<AssetMetadata>;

    /// Persist the metadata of an asset
    ///
    /// The label document is deleted unless the asset is tagged. The
    /// generator document is always written; it is never deleted.
    async fn save(&self, metadata: AssetMetadata) -> ServiceResult<AssetMetadata>;

    /// Write a label document, optionally under another path prefix
    ///
    /// Returns the name written to.
    async fn save_labels(&self, labels: &LabelData, path_prefix: Option<&str>)
        -> ServiceResult<String>;

    /// Write an OCR result for a document, optionally under another path prefix
    ///
    /// Returns the name written to.
    async fn save_ocr(
        &self,
        document: &str,
        ocr: &Value,
        path_prefix: Option<&str>,
    ) -> ServiceResult<String>;
}

/// Default implementation of MetadataStore
pub struct DefaultMetadataStore {
    storage: Arc<dyn StorageProvider>,
    notifier: Arc<dyn Notifier>,
    validator: LabelValidator,
    config: MetadataConfig,
}

impl DefaultMetadataStore {
    /// Create a new metadata store
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        notifier: Arc<dyn Notifier>,
        config: MetadataConfig,
    ) -> Self {
        Self {
            storage,
            notifier,
            validator: LabelValidator::new(),
            config,
        }
    }

    /// The naming configuration
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Report a recoverable problem
    fn report(&self, err: &MetadataError) {
        if err.is_informational() {
            info!("{}", err);
            self.notifier.info(&err.to_string());
        } else {
            warn!("{}", err);
            let persistent = matches!(err, MetadataError::UnreadableDocument { .. });
            self.notifier.error(&err.to_string(), persistent);
        }
    }

    /// Read a document, treating a missing or unreadable blob as absent
    async fn read_document(&self, path: &str) -> Option<String> {
        match self.storage.read_text(path, false).await {
            Ok(text) => text,
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(path, error = %e, "Failed to read metadata document");
                self.notifier
                    .error(&format!("Failed to read {}: {}", path, e), false);
                None
            }
        }
    }

    /// Label document of an asset
    ///
    /// `None` when the document is missing or is not valid JSON; an empty
    /// document for `document` when it fails validation.
    async fn load_label_data(&self, path: &str, document: &str) -> Option<LabelData> {
        let text = self.read_document(path).await?;

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                self.report(&MetadataError::UnreadableDocument {
                    path: path.to_string(),
                    reason: e.to_string(),
                });
                return None;
            }
        };

        match self.validator.validate(&value) {
            Ok(data) => Some(data),
            Err(err) => {
                self.report(&err);
                Some(LabelData::empty(document))
            }
        }
    }

    /// Generator document of an asset, `None` when missing or invalid
    async fn load_generators(&self, path: &str) -> Option<GeneratorDocument> {
        let text = self.read_document(path).await?;

        let parsed = serde_json::from_str::<Value>(&text)
            .map_err(|e| MetadataError::InvalidGeneratorDocument(format!("{}: {}", path, e)))
            .and_then(GeneratorDocument::from_value);
        match parsed {
            Ok(doc) => Some(doc),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    async fn write_document(&self, path: &str, text: &str) -> ServiceResult<()> {
        self.storage.write_text(path, text).await?;
        debug!(path, "Saved metadata document");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for DefaultMetadataStore {
    #[instrument(skip(self, asset), fields(asset = %asset.name))]
    async fn load(&self, asset: &Asset) -> ServiceResult<AssetMetadata> {
        if asset.name.is_empty() {
            return Err(ServiceError::PreconditionViolation(
                "asset name cannot be empty".to_string(),
            ));
        }

        let document = decode_name(&asset.name);
        let label_file = self.config.label_file(&document);
        let generator_file = self.config.generator_file(&document);

        let (label_data, generators) = tokio::join!(
            self.load_label_data(&label_file, &document),
            self.load_generators(&generator_file)
        );

        let mut metadata = AssetMetadata::new(asset.clone(), self.config.generate_count);
        if let Some(doc) = generators {
            metadata.generators = doc.generators;
            metadata.generator_settings = doc.generator_settings;
        }
        metadata.label_data = label_data;
        if metadata.label_count() > 0 {
            metadata.asset.state = AssetState::Tagged;
        }

        debug!(
            labels = metadata.label_count(),
            generators = metadata.generators.len(),
            "Loaded asset metadata"
        );
        Ok(metadata)
    }

    #[instrument(skip(self, metadata), fields(asset = %metadata.asset.name, state = %metadata.asset.state))]
    async fn save(&self, metadata: AssetMetadata) -> ServiceResult<AssetMetadata> {
        let document = decode_name(&metadata.asset.name);
        let label_file = self.config.label_file(&document);

        if metadata.asset.state != AssetState::Tagged {
            self.storage.delete_file(&label_file, true).await?;
            debug!(path = %label_file, "Removed label document of untagged asset");
        } else if let Some(ref labels) = metadata.label_data {
            self.write_document(&label_file, &to_stable_json(labels)?)
                .await?;
        }

        // generator settings always exist, so the generator document is always written
        let generator_file = self.config.generator_file(&document);
        self.write_document(&generator_file, &to_stable_json(&metadata.generator_document())?)
            .await?;

        Ok(metadata)
    }

    #[instrument(skip(self, labels), fields(document = %labels.document))]
    async fn save_labels(
        &self,
        labels: &LabelData,
        path_prefix: Option<&str>,
    ) -> ServiceResult<String> {
        let mut path = self.config.label_file(&labels.document);
        if let Some(prefix) = path_prefix {
            path = redirect_to_prefix(&path, prefix);
        }
        self.write_document(&path, &to_stable_json(labels)?).await?;
        Ok(path)
    }

    #[instrument(skip(self, ocr))]
    async fn save_ocr(
        &self,
        document: &str,
        ocr: &Value,
        path_prefix: Option<&str>,
    ) -> ServiceResult<String> {
        if document.is_empty() {
            return Err(ServiceError::PreconditionViolation(
                "document name cannot be empty".to_string(),
            ));
        }
        let mut path = self.config.ocr_file(document);
        if let Some(prefix) = path_prefix {
            path = redirect_to_prefix(&path, prefix);
        }
        self.write_document(&path, &to_stable_json(ocr)?).await?;
        Ok(path)
    }
}
