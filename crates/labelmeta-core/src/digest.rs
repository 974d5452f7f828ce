//! Path digests used for asset identity

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a normalized path string
pub fn path_digest(normalized_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_path.as_bytes());
    format!("{:x}", hasher.finalize())
}
