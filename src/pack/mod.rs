//! On-disk layout of a knowledge pack.
//!
//! A pack is a directory carrying an `index.md` manifest, leaf documents at
//! its root, nested packs as subdirectories, and compiled mirrors under the
//! reserved `_bytecode/` directory.

pub mod entries;
pub mod manifest;
pub mod mirror;

pub use entries::{list_entries, PackEntries};
pub use manifest::{is_pack, PackManifest};

/// Manifest file that gives a directory its pack identity
pub const MANIFEST_FILE: &str = "index.md";

/// Optional human-written summary; never treated as an item
pub const SUMMARY_FILE: &str = "summary.md";

/// Reserved directory holding compiled mirrors
pub const MIRROR_DIR: &str = "_bytecode";
