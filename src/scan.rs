//! Pack discovery: read-only walk over namespace roots.

use crate::pack;
use std::fs;
use std::path::{Path, PathBuf};

/// Find every pack root under the given namespace directories.
///
/// A directory that is itself a pack is reported and not descended into:
/// nested packs belong to their parent as composite items, not to the
/// namespace. Other directories are descended. Hidden and reserved names are
/// skipped, unreadable directories are skipped with a debug log, and the
/// result is sorted for determinism. No state is shared with the freshness
/// core; this only feeds it candidate roots.
pub fn find_packs(namespaces: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for namespace in namespaces {
        walk(namespace, &mut found);
    }
    found.sort();
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    if !dir.is_dir() {
        tracing::debug!("skipping missing namespace {}", dir.display());
        return;
    }

    if pack::is_pack(dir) {
        found.push(dir.to_path_buf());
        return;
    }

    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            tracing::debug!("skipping unreadable directory {}: {e}", dir.display());
            return;
        }
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        walk(&path, found);
    }
}
