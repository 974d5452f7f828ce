//! Asset records and format classification
//!
//! An [`Asset`] is created once, when a folder is enumerated, and is never
//! modified afterwards except for its labeling [`AssetState`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{AssetId, AssetState};

/// Extensions whose true format is checked against the file signature
pub const SNIFFED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "pdf"];

/// Coarse classification of an asset by its final format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Raster image (jpg, jpeg, png, bmp)
    Image,
    /// Multi-page TIFF image
    Tiff,
    /// PDF document
    Pdf,
    /// Anything the labeling tool cannot open
    Unknown,
}

impl AssetType {
    /// Classify a format string
    pub fn from_format(format: &str) -> Self {
        match format.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "bmp" => AssetType::Image,
            "tif" | "tiff" => AssetType::Tiff,
            "pdf" => AssetType::Pdf,
            _ => AssetType::Unknown,
        }
    }

    /// Get the string representation of the asset type
    pub fn as_str(&self) -> &str {
        match self {
            AssetType::Image => "image",
            AssetType::Tiff => "tiff",
            AssetType::Pdf => "pdf",
            AssetType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AssetType {
    fn default() -> Self {
        AssetType::Unknown
    }
}

/// A single labeled document or image tracked by a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Digest of the normalized path
    pub id: AssetId,

    /// Final format, after any signature-based correction
    pub format: String,

    /// Classification derived from `format`
    #[serde(rename = "type")]
    pub asset_type: AssetType,

    /// Labeling progress
    #[serde(default)]
    pub state: AssetState,

    /// Display name, usually the last path segment
    pub name: String,

    /// Normalized path (`file:`, `http://` or `https://` URI)
    pub path: String,

    /// Size in bytes, when the backend knows it
    #[serde(default)]
    pub size: Option<u64>,
}

impl Asset {
    /// Create an unvisited asset from an already normalized path
    pub fn new(
        normalized_path: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        let path = normalized_path.into();
        let format = format.into();
        Self {
            id: AssetId::from_path(&path),
            asset_type: AssetType::from_format(&format),
            format,
            state: AssetState::NotVisited,
            name: name.into(),
            path,
            size: None,
        }
    }

    /// Set the size reported by the backend
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Check if the asset has at least one label
    pub fn is_tagged(&self) -> bool {
        self.state == AssetState::Tagged
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.format, self.id)
    }
}
