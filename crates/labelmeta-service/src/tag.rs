//! Project-wide tag operations
//!
//! A [`TagOperation`] describes one edit of a tag (delete, rename, or a
//! field update). [`TagConsistencyEngine`] loads every asset of a project,
//! applies the operation to regions, labels and generators, and hands back
//! the metadata that changed. Persisting the result is up to the caller.

use futures::future::join_all;
use labelmeta_core::{Asset, AssetMetadata, Generator, GeneratorTag, Region};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::store::MetadataStore;

/// Optional tag fields carried by a rename or update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFields {
    pub color: Option<String>,
    pub tag_type: Option<String>,
    pub format: Option<String>,
}

impl TagFields {
    fn merge_into(&self, tag: &mut GeneratorTag) {
        if let Some(ref color) = self.color {
            tag.color = color.clone();
        }
        if let Some(ref tag_type) = self.tag_type {
            tag.tag_type = tag_type.clone();
        }
        if let Some(ref format) = self.format {
            tag.format = format.clone();
        }
    }
}

/// A project-wide edit of one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOperation {
    /// Remove the tag from regions and labels and unbind generators
    Delete { name: String },

    /// Rename the tag everywhere and merge `fields` into generator bindings
    Rename {
        from: String,
        to: String,
        fields: TagFields,
    },

    /// Change generator bindings of the tag only
    Update { name: String, fields: TagFields },
}

impl TagOperation {
    pub fn delete(name: impl Into<String>) -> Self {
        TagOperation::Delete { name: name.into() }
    }

    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        TagOperation::Rename {
            from: from.into(),
            to: to.into(),
            fields: TagFields::default(),
        }
    }

    pub fn update(name: impl Into<String>, fields: TagFields) -> Self {
        TagOperation::Update {
            name: name.into(),
            fields,
        }
    }

    /// The tag the operation targets
    pub fn tag_name(&self) -> &str {
        match self {
            TagOperation::Delete { name } | TagOperation::Update { name, .. } => name,
            TagOperation::Rename { from, .. } => from,
        }
    }

    /// Whether regions are rewritten
    pub fn rewrites_regions(&self) -> bool {
        !matches!(self, TagOperation::Update { .. })
    }

    /// Whether labels are rewritten
    pub fn rewrites_labels(&self) -> bool {
        !matches!(self, TagOperation::Update { .. })
    }

    fn transform_region(&self, region: &mut Region) {
        match self {
            TagOperation::Delete { name } => region.tags.retain(|t| t.as_str() != name.as_str()),
            TagOperation::Rename { from, to, .. } => {
                for tag in region.tags.iter_mut().filter(|t| t.as_str() == from.as_str()) {
                    *tag = to.clone();
                }
            }
            TagOperation::Update { .. } => {}
        }
    }

    fn transform_generator(&self, mut generator: Generator) -> Generator {
        if generator.tag_name() != Some(self.tag_name()) {
            return generator;
        }
        match self {
            TagOperation::Delete { .. } => generator.tag = None,
            TagOperation::Rename { to, fields, .. } => {
                if let Some(ref mut tag) = generator.tag {
                    tag.name = to.clone();
                    fields.merge_into(tag);
                }
            }
            TagOperation::Update { fields, .. } => {
                if let Some(ref mut tag) = generator.tag {
                    fields.merge_into(tag);
                }
            }
        }
        generator
    }

    /// Apply the operation to one asset's metadata
    ///
    /// Returns `true` when the metadata changed. When a region or label was
    /// touched, emptied regions are pruned and the asset state is recomputed
    /// from the remaining labels.
    pub fn apply_to(&self, metadata: &mut AssetMetadata) -> bool {
        let name = self.tag_name();
        let mut found = false;

        if self.rewrites_regions() {
            for region in metadata.regions.iter_mut().filter(|r| r.has_tag(name)) {
                self.transform_region(region);
                found = true;
            }
        }

        if self.rewrites_labels() {
            if let Some(ref mut labels) = metadata.label_data {
                if labels.has_label(name) {
                    match self {
                        TagOperation::Delete { .. } => labels.labels.retain(|l| l.label != name),
                        TagOperation::Rename { to, .. } => {
                            for label in labels.labels.iter_mut().filter(|l| l.label == name) {
                                label.label = to.clone();
                            }
                        }
                        TagOperation::Update { .. } => {}
                    }
                    found = true;
                }
            }
        }

        let generator_hit = metadata
            .generators
            .iter()
            .any(|g| g.tag_name() == Some(name));
        metadata.generators = std::mem::take(&mut metadata.generators)
            .into_iter()
            .map(|g| self.transform_generator(g))
            .collect();

        if found {
            metadata.prune_empty_regions();
            metadata.recompute_state();
            true
        } else {
            generator_hit
        }
    }
}

/// Applies tag operations across a set of assets
pub struct TagConsistencyEngine {
    store: Arc<dyn MetadataStore>,
}

impl TagConsistencyEngine {
    /// Create a new engine over a metadata store
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Apply an operation to every asset and return the changed metadata
    ///
    /// Assets are processed concurrently; the result keeps the input order.
    /// Nothing is saved.
    #[instrument(skip(self, assets), fields(assets = assets.len()))]
    pub async fn update_assets(
        &self,
        assets: &[Asset],
        operation: &TagOperation,
    ) -> ServiceResult<Vec<AssetMetadata>> {
        if operation.tag_name().is_empty() {
            return Err(ServiceError::PreconditionViolation(
                "tag name cannot be empty".to_string(),
            ));
        }
        if let TagOperation::Rename { to, .. } = operation {
            if to.is_empty() {
                return Err(ServiceError::PreconditionViolation(
                    "new tag name cannot be empty".to_string(),
                ));
            }
        }

        let results = join_all(assets.iter().map(|asset| async move {
            let mut metadata = self.store.load(asset).await?;
            let changed = operation.apply_to(&mut metadata);
            debug!(asset = %asset.name, changed, "Applied tag operation");
            Ok::<_, ServiceError>(changed.then_some(metadata))
        }))
        .await;

        let mut changed = Vec::new();
        for result in results {
            if let Some(metadata) = result? {
                changed.push(metadata);
            }
        }

        info!(
            tag = operation.tag_name(),
            changed = changed.len(),
            "Tag operation applied"
        );
        Ok(changed)
    }
}
