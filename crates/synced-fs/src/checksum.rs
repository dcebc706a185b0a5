//! SHA-256 checksum utilities
//!
//! Provides the canonical checksum format (`sha256:<hex>`) used to compare
//! local and repository copies, and short hex digests used to derive stable
//! file names.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of a file's contents.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// First `len` hex characters of the SHA-256 digest of `content`.
///
/// `len` is clamped to the full digest length (64).
pub fn short_hex_digest(content: &str, len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..len.min(hex.len())].to_string()
}
