//! Freshness inspector: pure, read-only staleness assessment of a pack tree.

pub mod types;

pub use types::{ItemFreshness, ItemState, PackFreshness, PackState};

use crate::error::{Error, Result};
use crate::hash;
use crate::pack::{self, entries::ItemEntry, mirror, MIRROR_DIR};
use std::fs;
use std::path::Path;

/// Assess the compilation freshness of a pack and all nested packs.
///
/// Pure and read-only: the returned tree is derived state, recomputed on
/// every call. Structural problems inside the pack (malformed mirrors,
/// unreadable sources, broken nested manifests) degrade to `dirty`/`absent`
/// or invisibility instead of failing, so a report is always producible for
/// any recognized pack.
///
/// # Errors
///
/// Returns [`Error::NotAPack`] when `pack_root` has no valid manifest, and
/// [`Error::Io`] when the pack root itself cannot be enumerated.
pub fn assess(pack_root: &Path) -> Result<PackFreshness> {
    if !pack::is_pack(pack_root) {
        return Err(Error::NotAPack(pack_root.to_path_buf()));
    }

    let entries = pack::list_entries(pack_root)?;
    let mirror_dir = pack_root.join(MIRROR_DIR);
    let mirror_exists = mirror_dir.is_dir();

    let mut items = Vec::new();
    let mut children = Vec::new();

    for leaf in &entries.leaves {
        let state = if mirror_exists {
            leaf_state(leaf, &mirror_dir)
        } else {
            ItemState::Absent
        };
        items.push(ItemFreshness {
            name: leaf.name.clone(),
            is_composite: false,
            state,
        });
    }

    for composite in &entries.composites {
        // The child is assessed regardless of the parent's mirror directory,
        // so nested staleness is visible before any compilation has happened.
        let child = match assess(&composite.path) {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(
                    "skipping nested pack {}: {e}",
                    composite.path.display()
                );
                items.push(ItemFreshness {
                    name: composite.name.clone(),
                    is_composite: true,
                    state: ItemState::Absent,
                });
                continue;
            }
        };

        let state = if mirror_exists {
            composite_state(composite, &child, &mirror_dir)
        } else {
            ItemState::Absent
        };
        items.push(ItemFreshness {
            name: composite.name.clone(),
            is_composite: true,
            state,
        });
        children.push(child);
    }

    if mirror_exists {
        for orphan in orphan_mirrors(&mirror_dir, &entries) {
            items.push(ItemFreshness {
                name: orphan,
                is_composite: false,
                state: ItemState::Orphan,
            });
        }
    }

    let state = if mirror_exists {
        rollup(&items)
    } else {
        PackState::Absent
    };

    Ok(PackFreshness {
        pack_root: pack_root.to_path_buf(),
        state,
        items,
        children,
    })
}

/// Freshness of one leaf item against its mirror.
fn leaf_state(leaf: &ItemEntry, mirror_dir: &Path) -> ItemState {
    let mirror_path = mirror::mirror_path(mirror_dir, &leaf.name);
    if !mirror_path.is_file() {
        return ItemState::Absent;
    }
    let Some(stored) = mirror::read_source_hash(&mirror_path) else {
        return ItemState::Dirty;
    };
    // An unreadable source cannot be verified against the mirror
    let Ok(content) = fs::read_to_string(&leaf.path) else {
        return ItemState::Dirty;
    };
    if hash::hash_content(&content) == stored {
        ItemState::Clean
    } else {
        ItemState::Dirty
    }
}

/// Freshness of a composite item in the parent's mirror directory.
///
/// A stale descendant makes any cached summary of the child stale by
/// construction, so the child's deep state is checked before any hash
/// comparison. The stored hash covers the concatenation of the child's own
/// mirrors, not the child's raw sources: a parent depends transitively on the
/// child's compiled state, never directly on grandchildren.
fn composite_state(
    composite: &ItemEntry,
    child: &PackFreshness,
    mirror_dir: &Path,
) -> ItemState {
    let mirror_path = mirror::mirror_path(mirror_dir, &composite.name);
    if !mirror_path.is_file() {
        return ItemState::Absent;
    }
    if child.deep_state() != PackState::Clean {
        return ItemState::Dirty;
    }
    let Some(stored) = mirror::read_source_hash(&mirror_path) else {
        return ItemState::Dirty;
    };
    match hash::hash_mirror_dir(&composite.path.join(MIRROR_DIR)) {
        Ok(current) if current == stored => ItemState::Clean,
        Ok(_) => ItemState::Dirty,
        Err(e) => {
            tracing::debug!(
                "could not hash mirrors of {}: {e}",
                composite.path.display()
            );
            ItemState::Dirty
        }
    }
}

/// Mirror stems with no corresponding live item, sorted for determinism.
fn orphan_mirrors(mirror_dir: &Path, entries: &pack::PackEntries) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(mirror_dir) else {
        return Vec::new();
    };

    let mut orphans: Vec<String> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .filter(|stem| !entries.contains(stem))
        .collect();
    orphans.sort();
    orphans
}

/// Pack-level rollup over item states.
///
/// Any orphan forces `corrupt`; a missing individual mirror only rolls up to
/// `dirty` once the mirror directory exists at all (`absent` at pack level is
/// reserved for the no-mirror-directory case).
fn rollup(items: &[ItemFreshness]) -> PackState {
    if items.iter().any(|i| i.state == ItemState::Orphan) {
        PackState::Corrupt
    } else if items
        .iter()
        .any(|i| matches!(i.state, ItemState::Dirty | ItemState::Absent))
    {
        PackState::Dirty
    } else {
        PackState::Clean
    }
}
