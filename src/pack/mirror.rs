//! Mirror file I/O: the compiled form of an item plus its stored source hash.

use crate::error::{Error, Result};
use crate::parser::frontmatter::extract_frontmatter_field;
use std::fs;
use std::path::{Path, PathBuf};

/// Header field recording the digest of the source state a mirror was
/// compiled from
const SOURCE_HASH_FIELD: &str = "source_hash";

/// Path of the mirror file for an item inside a mirror directory.
pub fn mirror_path(mirror_dir: &Path, item: &str) -> PathBuf {
    mirror_dir.join(format!("{item}.md"))
}

/// Read the stored source hash from a mirror file.
///
/// Returns `None` for an unreadable file, missing frontmatter, or a missing
/// `source_hash` field. Callers treat `None` as "cannot be trusted" rather
/// than an error, so one corrupt mirror never blocks inspecting the rest of
/// the pack.
pub fn read_source_hash(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    match extract_frontmatter_field(&content, SOURCE_HASH_FIELD) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::debug!("malformed mirror header {}: {e:#}", path.display());
            None
        }
    }
}

/// Write (or overwrite) an item's mirror with its compiled summary body.
pub fn write_mirror(mirror_dir: &Path, item: &str, source_hash: &str, body: &str) -> Result<()> {
    let path = mirror_path(mirror_dir, item);
    let body = body.trim_end();
    let content = format!("---\n{SOURCE_HASH_FIELD}: {source_hash}\n---\n\n{body}\n");
    fs::write(&path, content).map_err(|e| Error::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_source_hash() {
        let temp = TempDir::new().unwrap();
        write_mirror(temp.path(), "alpha", "sha256:abc123", "Summary of alpha").unwrap();

        let path = mirror_path(temp.path(), "alpha");
        assert_eq!(read_source_hash(&path), Some("sha256:abc123".to_string()));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("Summary of alpha\n"));
    }

    #[test]
    fn test_read_source_hash_missing_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_source_hash(&mirror_path(temp.path(), "ghost")), None);
    }

    #[test]
    fn test_read_source_hash_no_frontmatter() {
        let temp = TempDir::new().unwrap();
        let path = mirror_path(temp.path(), "bare");
        fs::write(&path, "Just a summary with no header\n").unwrap();
        assert_eq!(read_source_hash(&path), None);
    }

    #[test]
    fn test_read_source_hash_missing_field() {
        let temp = TempDir::new().unwrap();
        let path = mirror_path(temp.path(), "partial");
        fs::write(&path, "---\nother_field: value\n---\nBody\n").unwrap();
        assert_eq!(read_source_hash(&path), None);
    }

    #[test]
    fn test_write_mirror_overwrites() {
        let temp = TempDir::new().unwrap();
        write_mirror(temp.path(), "alpha", "sha256:old", "Old body").unwrap();
        write_mirror(temp.path(), "alpha", "sha256:new", "New body").unwrap();

        let path = mirror_path(temp.path(), "alpha");
        assert_eq!(read_source_hash(&path), Some("sha256:new".to_string()));
        assert!(fs::read_to_string(&path).unwrap().contains("New body"));
    }
}
