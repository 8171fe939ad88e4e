//! Content hashing for staleness comparison.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Compute the algorithm-tagged digest of arbitrary content.
///
/// The format is `sha256:<64 hex chars>`. Mirrors store this digest in their
/// `source_hash` header and the inspector compares it against a fresh digest
/// of the current source.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Compute the digest of a mirror directory's concatenated contents.
///
/// Every regular file in `dir` is read in sorted name order and the full
/// contents are concatenated before hashing. The sort makes the digest
/// reproducible regardless of filesystem iteration order. A missing directory
/// hashes as the empty string, so an empty child pack has a stable digest.
pub fn hash_mirror_dir(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        return Ok(hash_content(""));
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut concatenated = String::new();
    for path in &paths {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        concatenated.push_str(&content);
    }

    Ok(hash_content(&concatenated))
}
