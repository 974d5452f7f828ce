//! Storage layer for label metadata
//!
//! This crate defines the collaborators the metadata services are built on:
//! - [`StorageProvider`]: read/write/delete of named text blobs
//! - [`ContentReader`]: byte-prefix reads used for format sniffing
//! - [`AssetProvider`]: enumeration of the assets in a folder
//!
//! Two implementations are provided: [`InMemoryStorage`], which backs all
//! three traits with in-process maps, and [`LocalFileStorage`], a `tokio::fs`
//! backend rooted at a directory.

// Re-export core domain types for convenience
pub use labelmeta_core;

// Public modules
pub mod error;
pub mod local;
pub mod memory;
pub mod provider;

// Re-exports for convenience
pub use error::{StorageError, StorageResult};
pub use local::LocalFileStorage;
pub use memory::InMemoryStorage;
pub use provider::{AssetProvider, ContentReader, StorageProvider};
