//! Compilation orchestrator: delete orphans and recompile stale items
//! bottom-up.

pub mod outline;

pub use outline::OutlineCompiler;

use crate::error::{Error, Result};
use crate::freshness::{self, ItemState, PackState};
use crate::hash;
use crate::pack::{self, mirror, MIRROR_DIR};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Turns one source item into its compiled summary text.
///
/// `item_path` is the source file for a leaf or the subdirectory for a
/// composite; `pack_root` is the pack the item belongs to. Implementations
/// are opaque to the orchestrator.
pub trait ItemCompiler {
    fn compile(&self, item_path: &Path, pack_root: &Path) -> anyhow::Result<String>;
}

/// What a reconcile run changed.
///
/// Names merged from nested packs are prefixed with the child directory name
/// (`child/item`), in bottom-up order: a nested pack's entries always precede
/// the parent's own.
#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub compiled_items: Vec<String>,
    pub deleted_orphans: Vec<String>,
    pub state_before: PackState,
    pub state_after: PackState,
}

/// Reconcile a pack with its sources: delete orphan mirrors and recompile
/// every dirty or absent item.
///
/// With `deep`, nested packs whose deep state is not clean are reconciled
/// first. A composite's final freshness depends on its children's *compiled*
/// state, so grandchildren must finish before children, which must finish
/// before the parent's summary of them.
///
/// The procedure is confluent: run twice with no intervening external change,
/// the second run compiles and deletes nothing and reports `clean`.
///
/// # Errors
///
/// Fails fast on the first item compiler error ([`Error::Compile`]); mirrors
/// written before the failure remain valid and the next run resumes from
/// them. I/O failures abort with [`Error::Io`].
pub fn reconcile(
    pack_root: &Path,
    compiler: &dyn ItemCompiler,
    deep: bool,
) -> Result<ReconcileReport> {
    let before = freshness::assess(pack_root)?;
    let state_before = if deep {
        before.deep_state()
    } else {
        before.state
    };

    let mut compiled_items = Vec::new();
    let mut deleted_orphans = Vec::new();

    if deep {
        for child in &before.children {
            if child.deep_state() == PackState::Clean {
                continue;
            }
            let sub = reconcile(&child.pack_root, compiler, true)?;
            let prefix = child_name(&child.pack_root);
            compiled_items.extend(sub.compiled_items.iter().map(|n| format!("{prefix}/{n}")));
            deleted_orphans.extend(sub.deleted_orphans.iter().map(|n| format!("{prefix}/{n}")));
        }
    }

    let mirror_dir = pack_root.join(MIRROR_DIR);

    // Orphans flagged in the initial assessment; child recursion never adds
    // orphans at this level.
    for item in before.items.iter().filter(|i| i.state == ItemState::Orphan) {
        let path = mirror::mirror_path(&mirror_dir, &item.name);
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        tracing::debug!("deleted orphan mirror {}", path.display());
        deleted_orphans.push(item.name.clone());
    }

    fs::create_dir_all(&mirror_dir).map_err(|e| Error::io(&mirror_dir, e))?;

    let entries = pack::list_entries(pack_root)?;
    for item in before
        .items
        .iter()
        .filter(|i| matches!(i.state, ItemState::Dirty | ItemState::Absent))
    {
        let pool = if item.is_composite {
            &entries.composites
        } else {
            &entries.leaves
        };
        let Some(entry) = pool.iter().find(|e| e.name == item.name) else {
            // Source vanished between assessment and now; the next run will
            // flag the stale mirror as an orphan.
            tracing::warn!("item {} disappeared during reconcile", item.name);
            continue;
        };

        let text = compiler
            .compile(&entry.path, pack_root)
            .map_err(|e| Error::Compile {
                item: item.name.clone(),
                source: e.into(),
            })?;

        let source_hash = if item.is_composite {
            hash::hash_mirror_dir(&entry.path.join(MIRROR_DIR))?
        } else {
            let content =
                fs::read_to_string(&entry.path).map_err(|e| Error::io(&entry.path, e))?;
            hash::hash_content(&content)
        };

        mirror::write_mirror(&mirror_dir, &item.name, &source_hash, &text)?;
        compiled_items.push(item.name.clone());
    }

    let after = freshness::assess(pack_root)?;
    let state_after = if deep { after.deep_state() } else { after.state };

    Ok(ReconcileReport {
        compiled_items,
        deleted_orphans,
        state_before,
        state_after,
    })
}

fn child_name(pack_root: &Path) -> String {
    pack_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pack_root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::MANIFEST_FILE;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Compiler that records every item it is asked to compile.
    struct RecordingCompiler {
        log: RefCell<Vec<String>>,
    }

    impl RecordingCompiler {
        fn new() -> Self {
            Self {
                log: RefCell::new(Vec::new()),
            }
        }

        fn log(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl ItemCompiler for RecordingCompiler {
        fn compile(&self, item_path: &Path, _pack_root: &Path) -> anyhow::Result<String> {
            let name = item_path
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .into_owned();
            self.log.borrow_mut().push(name.clone());
            Ok(format!("Summary of {name}"))
        }
    }

    /// Compiler that fails on a specific item name.
    struct FailingCompiler {
        fail_on: String,
    }

    impl ItemCompiler for FailingCompiler {
        fn compile(&self, item_path: &Path, _pack_root: &Path) -> anyhow::Result<String> {
            let stem = item_path.file_stem().unwrap().to_string_lossy();
            if stem == self.fail_on {
                anyhow::bail!("synthetic failure for {stem}");
            }
            Ok(format!("Summary of {stem}"))
        }
    }

    fn make_pack(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            format!("---\nname: {name}\npurpose: test pack\n---\n"),
        )
        .unwrap();
    }

    fn write_leaf(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(format!("{name}.md")), content).unwrap();
    }

    #[test]
    fn test_reconcile_fresh_pack_compiles_everything() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        write_leaf(temp.path(), "alpha", "A");
        write_leaf(temp.path(), "beta", "B");

        let compiler = RecordingCompiler::new();
        let report = reconcile(temp.path(), &compiler, true).unwrap();

        assert_eq!(report.state_before, PackState::Absent);
        assert_eq!(report.state_after, PackState::Clean);
        assert_eq!(report.compiled_items, vec!["alpha", "beta"]);
        assert!(report.deleted_orphans.is_empty());
    }

    #[test]
    fn test_reconcile_deletes_orphans_and_heals() {
        // Scenario E: an orphan mirror plus a dirty item
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        write_leaf(temp.path(), "alpha", "A modified");
        let mirror_dir = temp.path().join(MIRROR_DIR);
        fs::create_dir_all(&mirror_dir).unwrap();
        mirror::write_mirror(&mirror_dir, "alpha", &hash::hash_content("A"), "old").unwrap();
        mirror::write_mirror(&mirror_dir, "ghost", "sha256:whatever", "ghost").unwrap();

        let compiler = RecordingCompiler::new();
        let report = reconcile(temp.path(), &compiler, true).unwrap();

        assert_eq!(report.state_before, PackState::Corrupt);
        assert_eq!(report.state_after, PackState::Clean);
        assert_eq!(report.deleted_orphans, vec!["ghost"]);
        assert_eq!(report.compiled_items, vec!["alpha"]);
        assert!(!mirror::mirror_path(&mirror_dir, "ghost").exists());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        write_leaf(temp.path(), "alpha", "A");
        let child_dir = temp.path().join("child");
        make_pack(&child_dir, "child");
        write_leaf(&child_dir, "gamma", "G");

        let compiler = RecordingCompiler::new();
        let first = reconcile(temp.path(), &compiler, true).unwrap();
        assert_eq!(first.state_after, PackState::Clean);
        assert!(!first.compiled_items.is_empty());

        let second = reconcile(temp.path(), &compiler, true).unwrap();
        assert!(second.compiled_items.is_empty());
        assert!(second.deleted_orphans.is_empty());
        assert_eq!(second.state_before, PackState::Clean);
        assert_eq!(second.state_after, PackState::Clean);
    }

    #[test]
    fn test_bottom_up_compilation_order() {
        // Three levels; only the grandchild's leaf is stale. The grandchild's
        // item must compile before the child's composite summary of it, which
        // must complete before the parent's composite summary of the child.
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "parent");
        let child_dir = temp.path().join("child");
        make_pack(&child_dir, "child");
        let grandchild_dir = child_dir.join("grandchild");
        make_pack(&grandchild_dir, "grandchild");
        write_leaf(&grandchild_dir, "delta", "D");

        let compiler = RecordingCompiler::new();
        let report = reconcile(temp.path(), &compiler, true).unwrap();

        assert_eq!(report.state_after, PackState::Clean);
        assert_eq!(compiler.log(), vec!["delta", "grandchild", "child"]);
        assert_eq!(
            report.compiled_items,
            vec!["child/grandchild/delta", "child/grandchild", "child"]
        );
    }

    #[test]
    fn test_composite_hash_covers_child_mirrors() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        let child_dir = temp.path().join("child");
        make_pack(&child_dir, "child");
        write_leaf(&child_dir, "gamma", "G");

        let compiler = RecordingCompiler::new();
        reconcile(temp.path(), &compiler, true).unwrap();

        let stored = mirror::read_source_hash(&mirror::mirror_path(
            &temp.path().join(MIRROR_DIR),
            "child",
        ))
        .unwrap();
        let expected = hash::hash_mirror_dir(&child_dir.join(MIRROR_DIR)).unwrap();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_shallow_reconcile_skips_children() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        let child_dir = temp.path().join("child");
        make_pack(&child_dir, "child");
        write_leaf(&child_dir, "gamma", "G");

        let compiler = RecordingCompiler::new();
        let report = reconcile(temp.path(), &compiler, false).unwrap();

        // The parent's own summary of the child is compiled, but the child's
        // internal mirrors are untouched.
        assert_eq!(report.compiled_items, vec!["child"]);
        assert!(!child_dir.join(MIRROR_DIR).join("gamma.md").exists());
        // The child is still stale inside, so the composite stays dirty:
        // only a deep reconcile converges on a stale hierarchy.
        assert_eq!(report.state_after, PackState::Dirty);
    }

    #[test]
    fn test_compiler_failure_fails_fast() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        write_leaf(temp.path(), "alpha", "A");
        write_leaf(temp.path(), "beta", "B");

        let compiler = FailingCompiler {
            fail_on: "alpha".to_string(),
        };
        let err = reconcile(temp.path(), &compiler, true).unwrap_err();
        assert!(matches!(err, Error::Compile { ref item, .. } if item == "alpha"));
        // beta sorts after alpha, so nothing was compiled before the abort
        assert!(!mirror::mirror_path(&temp.path().join(MIRROR_DIR), "beta").exists());
    }

    #[test]
    fn test_partial_failure_heals_on_next_run() {
        let temp = TempDir::new().unwrap();
        make_pack(temp.path(), "root");
        write_leaf(temp.path(), "alpha", "A");
        write_leaf(temp.path(), "beta", "B");

        let failing = FailingCompiler {
            fail_on: "beta".to_string(),
        };
        // alpha compiles, then beta aborts the run
        assert!(reconcile(temp.path(), &failing, true).is_err());
        assert!(mirror::mirror_path(&temp.path().join(MIRROR_DIR), "alpha").exists());

        let compiler = RecordingCompiler::new();
        let report = reconcile(temp.path(), &compiler, true).unwrap();
        assert_eq!(report.compiled_items, vec!["beta"]);
        assert_eq!(report.state_after, PackState::Clean);
    }

    #[test]
    fn test_reconcile_not_a_pack() {
        let temp = TempDir::new().unwrap();
        let compiler = RecordingCompiler::new();
        let err = reconcile(temp.path(), &compiler, true).unwrap_err();
        assert!(matches!(err, Error::NotAPack(_)));
    }
}
