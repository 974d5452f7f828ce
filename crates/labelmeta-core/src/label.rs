//! Label documents
//!
//! A [`LabelData`] document holds the ground-truth annotations of one asset.
//! Fields this crate does not interpret (OCR text, keys, schema markers) are
//! kept in the `extra` maps so a load/save cycle never drops them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ground-truth annotation document for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    /// Decoded asset name the document belongs to
    pub document: String,

    /// Labels, unique by name
    pub labels: Vec<Label>,

    /// Unrecognized top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LabelData {
    /// Create an empty document for an asset
    pub fn empty(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            labels: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Create a document with labels
    pub fn with_labels(document: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            labels,
            ..Self::empty(document)
        }
    }

    /// Find a label by tag name
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.label == name)
    }

    /// Check if a label with this tag name exists
    pub fn has_label(&self, name: &str) -> bool {
        self.label(name).is_some()
    }

    /// Check if the document has no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Annotation of one tag on an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Tag name
    pub label: String,

    /// Annotated spans
    #[serde(default)]
    pub value: Vec<LabelValue>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Label {
    /// Create a label
    pub fn new(label: impl Into<String>, value: Vec<LabelValue>) -> Self {
        Self {
            label: label.into(),
            value,
            extra: Map::new(),
        }
    }
}

/// A set of bounding boxes on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValue {
    /// One-based page number
    pub page: u32,

    /// Boxes as flat coordinate lists
    #[serde(default)]
    pub bounding_boxes: Vec<Vec<f64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LabelValue {
    /// Create a value on a page
    pub fn new(page: u32, bounding_boxes: Vec<Vec<f64>>) -> Self {
        Self {
            page,
            bounding_boxes,
            extra: Map::new(),
        }
    }

    /// Attach the recognized text of the span
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.extra.insert("text".to_string(), Value::String(text.into()));
        self
    }
}
