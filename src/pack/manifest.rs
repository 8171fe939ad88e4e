//! Pack manifest parsing and the pack identity predicate.

use super::MANIFEST_FILE;
use crate::parser::frontmatter::parse_from_markdown;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Identity header of a pack, stored as `index.md` frontmatter.
///
/// Only `name` and `purpose` are load-bearing; the markdown body below the
/// frontmatter is free-form and ignored by the core.
#[derive(Debug, Clone, Deserialize)]
pub struct PackManifest {
    pub name: String,
    pub purpose: String,
}

impl PackManifest {
    /// Load and validate the manifest of a pack root.
    ///
    /// # Errors
    ///
    /// Returns an error if `index.md` is missing, unreadable, has no valid
    /// frontmatter, or leaves `name`/`purpose` empty.
    pub fn load(pack_root: &Path) -> Result<Self> {
        let path = pack_root.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest: PackManifest = parse_from_markdown(&content, "pack manifest")
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;

        if manifest.name.trim().is_empty() {
            bail!("Manifest has empty name: {}", path.display());
        }
        if manifest.purpose.trim().is_empty() {
            bail!("Manifest has empty purpose: {}", path.display());
        }

        Ok(manifest)
    }
}

/// Pack identity predicate: does this directory carry a valid manifest?
///
/// Subdirectories failing this test are invisible to the inspector, so a
/// malformed nested manifest never aborts inspection of its siblings.
pub fn is_pack(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match PackManifest::load(dir) {
        Ok(_) => true,
        Err(e) => {
            if dir.join(MANIFEST_FILE).exists() {
                tracing::debug!("ignoring directory with invalid manifest: {e:#}");
            }
            false
        }
    }
}
