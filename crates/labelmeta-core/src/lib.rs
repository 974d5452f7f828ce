//! Core domain models and types for label metadata
//!
//! This crate contains the data structures and pure logic shared by the
//! storage and service layers: asset records and their path-derived
//! identity, label and generator documents, file-signature sniffing, path
//! helpers and the stable JSON encoding used for every persisted document.

pub mod asset;
pub mod collections;
pub mod digest;
pub mod error;
pub mod json;
pub mod label;
pub mod metadata;
pub mod path;
pub mod sniff;
pub mod types;

// Re-exports for convenience
pub use asset::{Asset, AssetType};
pub use collections::{find_duplicate_by, has_duplicates_by};
pub use digest::path_digest;
pub use error::{MetadataError, Result};
pub use json::to_stable_json;
pub use label::{Label, LabelData, LabelValue};
pub use metadata::{
    AssetMetadata, Generator, GeneratorDocument, GeneratorSettings, GeneratorTag, Region,
};
pub use sniff::FormatSniffer;
pub use types::{AssetId, AssetState};

/// Version stamped into every freshly built [`AssetMetadata`]
pub const METADATA_VERSION: &str = env!("CARGO_PKG_VERSION");
