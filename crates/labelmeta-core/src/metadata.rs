//! Per-asset metadata
//!
//! [`AssetMetadata`] is assembled from two independently stored documents:
//! the label document and the generator document. Regions and generators are
//! owned by callers outside this crate, so only the fields the tag engine
//! needs are typed; everything else rides along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::Asset;
use crate::error::{MetadataError, Result};
use crate::label::LabelData;
use crate::types::AssetState;
use crate::METADATA_VERSION;

/// Default number of synthetic samples a generator produces
pub const DEFAULT_GENERATE_COUNT: u32 = 40;

/// A spatial annotation carrying tag names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Tag names; a region with no tags is pruned
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Region {
    /// Create a region with tags
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags,
            extra: Map::new(),
        }
    }

    /// Check if the region references a tag
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

/// Tag binding of a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorTag {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "type", default)]
    pub tag_type: String,
    #[serde(default)]
    pub format: String,
}

impl GeneratorTag {
    /// Create a tag binding with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: String::new(),
            tag_type: String::new(),
            format: String::new(),
        }
    }
}

/// An auto-labeling rule, optionally bound to a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    #[serde(default)]
    pub tag: Option<GeneratorTag>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Generator {
    /// Create a generator bound to a tag
    pub fn bound_to(tag: GeneratorTag) -> Self {
        Self {
            tag: Some(tag),
            extra: Map::new(),
        }
    }

    /// Name of the bound tag, if any
    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_ref().map(|t| t.name.as_str())
    }

    /// Build a generator from a stored entry
    ///
    /// Legacy entries carry `name`, `color`, `type` and `format` at the top
    /// level instead of a `tag` object. The binding is synthesized from those
    /// fields and they are moved out of `extra`, so a later save writes only
    /// the `tag` object and a cleared binding stays cleared.
    pub fn from_stored(entry: Value) -> Result<Self> {
        let mut generator: Generator = serde_json::from_value(entry).map_err(|e| {
            MetadataError::InvalidGeneratorDocument(format!("invalid generator entry: {}", e))
        })?;

        if generator.tag.is_none() {
            generator.tag = take_legacy_tag(&mut generator.extra);
        }

        Ok(generator)
    }
}

fn take_legacy_tag(fields: &mut Map<String, Value>) -> Option<GeneratorTag> {
    // a generator whose binding was cleared has no legacy name to fall back on
    fields.get("name").and_then(Value::as_str)?;

    let mut take = |key: &str| match fields.remove(key) {
        Some(Value::String(value)) => value,
        _ => String::new(),
    };
    let tag = GeneratorTag {
        name: take("name"),
        color: take("color"),
        tag_type: take("type"),
        format: take("format"),
    };
    Some(tag)
}

/// Settings shared by all generators of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    pub generate_count: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratorSettings {
    /// Settings with a given sample count
    pub fn with_count(generate_count: u32) -> Self {
        Self {
            generate_count,
            extra: Map::new(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::with_count(DEFAULT_GENERATE_COUNT)
    }
}

/// Persisted shape of the generator file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorDocument {
    pub generators: Vec<Generator>,
    pub generator_settings: GeneratorSettings,
}

impl GeneratorDocument {
    /// Validate and decode a parsed generator document
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut doc) = value else {
            return Err(MetadataError::InvalidGeneratorDocument(
                "document is not an object".to_string(),
            ));
        };

        let (Some(generators), Some(settings)) =
            (doc.remove("generators"), doc.remove("generatorSettings"))
        else {
            return Err(MetadataError::InvalidGeneratorDocument(
                "missing generators or generatorSettings".to_string(),
            ));
        };

        let Value::Array(entries) = generators else {
            return Err(MetadataError::InvalidGeneratorDocument(
                "generators is not an array".to_string(),
            ));
        };

        let generators = entries
            .into_iter()
            .map(Generator::from_stored)
            .collect::<Result<Vec<_>>>()?;
        let generator_settings = serde_json::from_value(settings).map_err(|e| {
            MetadataError::InvalidGeneratorDocument(format!("invalid generatorSettings: {}", e))
        })?;

        Ok(Self {
            generators,
            generator_settings,
        })
    }
}

/// Everything stored about one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub asset: Asset,

    #[serde(default)]
    pub regions: Vec<Region>,

    #[serde(default)]
    pub generators: Vec<Generator>,

    #[serde(default)]
    pub generator_settings: GeneratorSettings,

    pub version: String,

    /// `None` when no label document exists or it could not be parsed
    #[serde(default)]
    pub label_data: Option<LabelData>,
}

impl AssetMetadata {
    /// Empty metadata shell for an asset
    pub fn new(asset: Asset, generate_count: u32) -> Self {
        Self {
            asset,
            regions: Vec::new(),
            generators: Vec::new(),
            generator_settings: GeneratorSettings::with_count(generate_count),
            version: METADATA_VERSION.to_string(),
            label_data: None,
        }
    }

    /// Number of labels, zero when there is no label document
    pub fn label_count(&self) -> usize {
        self.label_data.as_ref().map_or(0, |d| d.labels.len())
    }

    /// Drop regions whose tag list is empty
    pub fn prune_empty_regions(&mut self) {
        self.regions.retain(|r| !r.tags.is_empty());
    }

    /// Set the asset state from the current label count
    pub fn recompute_state(&mut self) -> AssetState {
        self.asset.state = AssetState::from_label_count(self.label_count());
        self.asset.state
    }

    /// Generator portion of the metadata in its persisted shape
    pub fn generator_document(&self) -> GeneratorDocument {
        GeneratorDocument {
            generators: self.generators.clone(),
            generator_settings: self.generator_settings.clone(),
        }
    }
}
