//! Asset listing
//!
//! [`AssetCatalog`] filters a provider's listing down to the supported assets
//! directly inside one folder. [`FolderAssetProvider`] is the provider for a
//! local directory tree: every file is resolved through [`AssetIdentity`] so
//! listed assets carry sniffed formats and sizes.

use async_trait::async_trait;
use futures::future::join_all;
use labelmeta_core::path::{decode_name, encode_file_uri, is_in_exact_folder_path};
use labelmeta_core::{Asset, AssetType};
use labelmeta_storage::{AssetProvider, LocalFileStorage, StorageError, StorageResult};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::ServiceResult;
use crate::identity::AssetIdentity;

/// Supported assets of a project folder
pub struct AssetCatalog {
    provider: Arc<dyn AssetProvider>,
}

impl AssetCatalog {
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        Self { provider }
    }

    /// Assets directly inside `folder`
    ///
    /// Assets of an unsupported type and assets in nested folders are left
    /// out. `None` or an empty folder means the project root. The folder is
    /// handed to the provider as given and matched against asset names
    /// without regard to case.
    ///
    /// Names are returned as the provider reports them. Percent-decoding is
    /// left to [`MetadataStore`](crate::store::MetadataStore), which derives
    /// document names from them, so a name is decoded exactly once.
    #[instrument(skip(self))]
    pub async fn list_assets(&self, folder: Option<&str>) -> ServiceResult<Vec<Asset>> {
        let folder = folder.unwrap_or_default();
        let assets = self.provider.list_assets(Some(folder)).await?;
        let total = assets.len();

        let wanted = folder.to_lowercase();
        let listed: Vec<Asset> = assets
            .into_iter()
            .filter(|a| a.asset_type != AssetType::Unknown)
            .filter(|a| is_in_exact_folder_path(&decode_name(&a.name).to_lowercase(), &wanted))
            .collect();

        debug!(total, listed = listed.len(), "Listed assets");
        Ok(listed)
    }
}

/// Asset provider over a local directory tree
///
/// Asset names are the percent-encoded paths relative to the storage root,
/// so metadata documents land next to their asset.
pub struct FolderAssetProvider {
    storage: LocalFileStorage,
    identity: Arc<dyn AssetIdentity>,
}

impl FolderAssetProvider {
    pub fn new(storage: LocalFileStorage, identity: Arc<dyn AssetIdentity>) -> Self {
        Self { storage, identity }
    }

    async fn resolve_file(&self, root: &str, relative: &str) -> Option<Asset> {
        let name = relative
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let uri = encode_file_uri(&format!("{}/{}", root.trim_end_matches('/'), relative));

        let asset = match self.identity.resolve(&uri, Some(&name)).await {
            Ok(asset) => asset,
            Err(e) => {
                warn!(file = relative, error = %e, "Skipping unresolvable file");
                return None;
            }
        };
        match self.storage.file_size(relative).await {
            Ok(size) => Some(asset.with_size(size)),
            Err(_) => Some(asset),
        }
    }
}

#[async_trait]
impl AssetProvider for FolderAssetProvider {
    async fn list_assets(&self, folder: Option<&str>) -> StorageResult<Vec<Asset>> {
        let root = tokio::fs::canonicalize(self.storage.root())
            .await
            .map_err(|e| StorageError::from_io(self.storage.root().display().to_string(), e))?;
        let root = root.to_string_lossy().replace('\\', "/");

        let files = self.storage.list_files(folder).await?;
        let resolved = join_all(files.iter().map(|f| self.resolve_file(&root, f))).await;
        Ok(resolved.into_iter().flatten().collect())
    }
}
