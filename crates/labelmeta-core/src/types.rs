//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset identifier derived from the normalized asset path
///
/// The id is a digest of the path string, not of the file content, so the
/// same bytes under a different path yield a different id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Derive the id for a normalized path
    pub fn from_path(normalized_path: &str) -> Self {
        Self(crate::digest::path_digest(normalized_path))
    }

    /// Get the hexadecimal digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Labeling progress of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetState {
    /// Never opened for labeling
    NotVisited,
    /// Opened, but carries no labels
    Visited,
    /// Has at least one label
    Tagged,
}

impl AssetState {
    /// State implied by the number of labels an asset carries
    pub fn from_label_count(count: usize) -> Self {
        if count > 0 {
            Self::Tagged
        } else {
            Self::Visited
        }
    }
}

impl Default for AssetState {
    fn default() -> Self {
        Self::NotVisited
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotVisited => write!(f, "not_visited"),
            Self::Visited => write!(f, "visited"),
            Self::Tagged => write!(f, "tagged"),
        }
    }
}

impl FromStr for AssetState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_visited" => Ok(Self::NotVisited),
            "visited" => Ok(Self::Visited),
            "tagged" => Ok(Self::Tagged),
            _ => Err(format!("Invalid asset state: {}", s)),
        }
    }
}
