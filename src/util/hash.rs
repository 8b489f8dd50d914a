//! Content digests.

use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::util::fs::FileSystem;

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of a file read through `fs`.
pub fn sha256_file(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs
        .read(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;
    Ok(sha256_bytes(&bytes))
}
