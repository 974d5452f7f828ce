//! Asset identity resolution
//!
//! Turns a path (and optional display name) into an [`Asset`]: the path is
//! normalized, hashed into the asset id, and for recognized image/document
//! extensions the first bytes are sniffed so that a mislabeled file gets its
//! real format.

use async_trait::async_trait;
use labelmeta_core::asset::SNIFFED_FORMATS;
use labelmeta_core::path::{last_path_segment, nominal_extension, normalize_path};
use labelmeta_core::{Asset, FormatSniffer};
use labelmeta_storage::ContentReader;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::notifier::Notifier;

/// Trait for asset identity operations
#[async_trait]
pub trait AssetIdentity: Send + Sync {
    /// Build the asset record for a path
    ///
    /// `name` defaults to the last segment of the normalized path.
    async fn resolve(&self, path: &str, name: Option<&str>) -> ServiceResult<Asset>;
}

/// Default implementation of AssetIdentity
pub struct DefaultAssetIdentity {
    reader: Arc<dyn ContentReader>,
    notifier: Arc<dyn Notifier>,
    sniffer: FormatSniffer,
}

impl DefaultAssetIdentity {
    /// Create a new identity resolver
    pub fn new(reader: Arc<dyn ContentReader>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            reader,
            notifier,
            sniffer: FormatSniffer::new(),
        }
    }

    /// Sniffed format when it contradicts the extension
    ///
    /// `None` keeps the nominal extension: the content matched it, matched
    /// nothing, or could not be read.
    async fn corrected_format(&self, uri: &str, extension: &str) -> Option<&'static str> {
        debug!(uri, range_end = self.sniffer.range_end(), "Fetching asset prefix");
        let prefix = match self.reader.read_prefix(uri, self.sniffer.prefix_len()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(uri, error = %e, "Could not read asset prefix, keeping extension");
                return None;
            }
        };

        let sniffed = self.sniffer.sniff(&prefix);
        debug!(uri, ?sniffed, "Sniffed asset signature");
        match sniffed.first() {
            Some(first) if !sniffed.contains(&extension) => Some(*first),
            _ => None,
        }
    }

    /// Deliver the correction notice without holding up resolution
    fn schedule_correction(&self, name: &str, extension: &str, format: &str) {
        let message = format!(
            "The content of \"{}\" does not match its .{} extension; it will be treated as {}",
            name, extension, format
        );
        let notifier = Arc::clone(&self.notifier);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { notifier.info(&message) });
            }
            Err(_) => notifier.info(&message),
        }
    }
}

#[async_trait]
impl AssetIdentity for DefaultAssetIdentity {
    #[instrument(skip(self))]
    async fn resolve(&self, path: &str, name: Option<&str>) -> ServiceResult<Asset> {
        if path.trim().is_empty() {
            return Err(ServiceError::PreconditionViolation(
                "asset path cannot be empty".to_string(),
            ));
        }

        let normalized = normalize_path(path);
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => last_path_segment(&normalized).to_string(),
        };

        let extension = nominal_extension(&name);
        let mut format = extension.clone();
        if SNIFFED_FORMATS.contains(&extension.as_str()) {
            if let Some(actual) = self.corrected_format(&normalized, &extension).await {
                self.schedule_correction(&name, &extension, actual);
                format = actual.to_string();
            }
        }

        let asset = Asset::new(normalized, name, format);
        debug!(id = %asset.id, format = %asset.format, "Resolved asset");
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use labelmeta_core::{AssetId, AssetState, AssetType};
    use labelmeta_storage::{InMemoryStorage, StorageError, StorageResult};
    use mockall::mock;

    mock! {
        Reader {}

        #[async_trait]
        impl ContentReader for Reader {
            async fn read_prefix(&self, uri: &str, len: usize) -> StorageResult<Vec<u8>>;
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn resolver(storage: Arc<InMemoryStorage>, notifier: Arc<RecordingNotifier>) -> DefaultAssetIdentity {
        DefaultAssetIdentity::new(storage, notifier)
    }

    #[tokio::test]
    async fn test_empty_path_rejected() {
        let identity = resolver(Arc::new(InMemoryStorage::new()), Arc::new(RecordingNotifier::new()));
        let err = identity.resolve("", None).await.unwrap_err();
        assert!(err.is_precondition());
        let err = identity.resolve("   ", Some("a.png")).await.unwrap_err();
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn test_png_with_jpg_extension_is_corrected() {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .insert_content("file:/scans/photo.jpg", vec![0x89, 0x50, 0x4e, 0x47])
            .await;
        let notifier = Arc::new(RecordingNotifier::new());
        let identity = resolver(storage, notifier.clone());

        let asset = identity.resolve("/scans/photo.jpg", None).await.unwrap();
        assert_eq!(asset.format, "png");
        assert_eq!(asset.asset_type, AssetType::Image);
        assert_eq!(asset.name, "photo.jpg");
        assert_eq!(asset.state, AssetState::NotVisited);
        assert_eq!(asset.size, None);
        assert_eq!(asset.id, AssetId::from_path("file:/scans/photo.jpg"));

        settle().await;
        let infos = notifier.infos();
        assert_eq!(infos.len(), 1);
        assert!(infos[0].contains("photo.jpg"));
        assert!(infos[0].contains("png"));
    }

    #[tokio::test]
    async fn test_matching_signature_keeps_format() {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .insert_content("file:/a/scan.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE1])
            .await;
        let notifier = Arc::new(RecordingNotifier::new());
        let identity = resolver(storage, notifier.clone());

        let asset = identity.resolve("/a/scan.jpeg", None).await.unwrap();
        assert_eq!(asset.format, "jpeg");
        settle().await;
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_signature_keeps_extension() {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .insert_content("file:/a/form.tiff", vec![0x00, 0x00, 0x00, 0x00])
            .await;
        let identity = resolver(storage, Arc::new(RecordingNotifier::new()));

        let asset = identity.resolve("/a/form.tiff", None).await.unwrap();
        assert_eq!(asset.format, "tiff");
        assert_eq!(asset.asset_type, AssetType::Tiff);
    }

    #[tokio::test]
    async fn test_unreadable_prefix_keeps_extension() {
        let mut reader = MockReader::new();
        reader
            .expect_read_prefix()
            .times(1)
            .returning(|uri, _| Err(StorageError::Unsupported(uri.to_string())));
        let notifier = Arc::new(RecordingNotifier::new());
        let identity = DefaultAssetIdentity::new(Arc::new(reader), notifier.clone());

        let asset = identity
            .resolve("https://host/docs/invoice.pdf?sig=abc", None)
            .await
            .unwrap();
        assert_eq!(asset.path, "https://host/docs/invoice.pdf?sig=abc");
        assert_eq!(asset.name, "invoice.pdf?sig=abc");
        assert_eq!(asset.format, "pdf");
        assert_eq!(asset.asset_type, AssetType::Pdf);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_extension_is_not_sniffed() {
        let mut reader = MockReader::new();
        reader.expect_read_prefix().never();
        let identity = DefaultAssetIdentity::new(Arc::new(reader), Arc::new(RecordingNotifier::new()));

        let asset = identity.resolve("C:\\work\\notes.txt", None).await.unwrap();
        assert_eq!(asset.path, "file:C:/work/notes.txt");
        assert_eq!(asset.format, "txt");
        assert_eq!(asset.asset_type, AssetType::Unknown);
    }

    #[tokio::test]
    async fn test_supplied_name_wins() {
        let mut reader = MockReader::new();
        reader
            .expect_read_prefix()
            .withf(|uri, len| uri == "file:/blob/0001" && *len == 4)
            .returning(|_, _| Ok(b"%PDF-1.7".to_vec()));
        let identity = DefaultAssetIdentity::new(Arc::new(reader), Arc::new(RecordingNotifier::new()));

        let asset = identity.resolve("/blob/0001", Some("contract.pdf")).await.unwrap();
        assert_eq!(asset.name, "contract.pdf");
        assert_eq!(asset.format, "pdf");
    }
}
