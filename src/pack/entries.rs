//! Item enumeration: partition a pack root into leaf and composite items.

use super::{manifest, MANIFEST_FILE, SUMMARY_FILE};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One enumerated item with its resolved source path.
///
/// `name` is the filename stem for a leaf and the directory name for a
/// composite; mirrors are addressed by this name.
#[derive(Debug, Clone)]
pub struct ItemEntry {
    pub name: String,
    pub path: PathBuf,
}

/// The live items of a pack root, partitioned and sorted by name.
#[derive(Debug, Default)]
pub struct PackEntries {
    pub leaves: Vec<ItemEntry>,
    pub composites: Vec<ItemEntry>,
}

impl PackEntries {
    /// Whether any live item (leaf or composite) carries this name.
    pub fn contains(&self, name: &str) -> bool {
        self.leaves.iter().any(|e| e.name == name)
            || self.composites.iter().any(|e| e.name == name)
    }
}

/// Names excluded from enumeration at every nesting level.
fn is_reserved(name: &str) -> bool {
    name.starts_with('.')
        || name.starts_with('_')
        || name == MANIFEST_FILE
        || name == SUMMARY_FILE
}

/// Enumerate the items of a pack root.
///
/// Files become leaf items identified by their stem. Subdirectories become
/// composite items only when they are themselves packs; a subdirectory
/// without a valid manifest is invisible, neither scanned nor reported.
/// Hidden names, reserved names (which covers `_bytecode/`), the manifest,
/// and the human summary are never items.
pub fn list_entries(pack_root: &Path) -> Result<PackEntries> {
    let mut entries = PackEntries::default();

    let read_dir = fs::read_dir(pack_root).map_err(|e| Error::io(pack_root, e))?;
    for entry in read_dir.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_reserved(name) {
            continue;
        }

        if path.is_dir() {
            if manifest::is_pack(&path) {
                entries.composites.push(ItemEntry {
                    name: name.to_string(),
                    path,
                });
            }
        } else if path.is_file() {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.leaves.push(ItemEntry {
                name: stem.to_string(),
                path,
            });
        }
    }

    entries.leaves.sort_by(|a, b| a.name.cmp(&b.name));
    entries.composites.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries)
}
