//! Built-in item compiler: condenses a document to its outline.
//!
//! The orchestrator only needs *an* `ItemCompiler`; this one is deterministic
//! pure text processing, so compiled mirrors are reproducible and cheap to
//! diff.

use super::ItemCompiler;
use crate::pack::{PackManifest, MIRROR_DIR};
use crate::parser::frontmatter::strip_frontmatter;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const MAX_LINES_PER_SECTION: usize = 5;
const MAX_FALLBACK_LINES: usize = 10;

/// Compiles a leaf document down to its headers and leading bullets, and a
/// nested pack down to a one-line-per-mirror digest of its compiled contents.
#[derive(Debug, Default)]
pub struct OutlineCompiler;

impl ItemCompiler for OutlineCompiler {
    fn compile(&self, item_path: &Path, _pack_root: &Path) -> Result<String> {
        if item_path.is_dir() {
            compile_pack_summary(item_path)
        } else {
            compile_document(item_path)
        }
    }
}

/// Outline of a single source document.
fn compile_document(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source document: {}", path.display()))?;
    let body = strip_frontmatter(&content);

    let mut outline = String::new();
    let mut in_section = false;
    let mut line_count = 0;

    for line in body.lines() {
        if line.starts_with("# ") {
            outline.push_str(line);
            outline.push('\n');
            continue;
        }

        if line.starts_with("## ") {
            if in_section {
                outline.push('\n');
            }
            outline.push_str(line);
            outline.push('\n');
            in_section = true;
            line_count = 0;
            continue;
        }

        if in_section
            && line_count < MAX_LINES_PER_SECTION
            && (line.starts_with("- ") || line.starts_with("* "))
        {
            outline.push_str(line);
            outline.push('\n');
            line_count += 1;
        }
    }

    if outline.is_empty() {
        // Headerless document: keep the first few non-empty lines instead
        for line in body.lines().filter(|l| !l.trim().is_empty()).take(MAX_FALLBACK_LINES) {
            outline.push_str(line);
            outline.push('\n');
        }
    }

    Ok(outline.trim_end().to_string())
}

/// Summary of a whole nested pack, built from its manifest and its compiled
/// mirrors.
///
/// This is the parent's view of the child: by the time the orchestrator asks
/// for it, the child's own mirrors have already been regenerated.
fn compile_pack_summary(pack_dir: &Path) -> Result<String> {
    let manifest = PackManifest::load(pack_dir)?;

    let mut summary = format!("# {}\n\n> {}\n", manifest.name, manifest.purpose);

    let mirror_dir = pack_dir.join(MIRROR_DIR);
    let mut mirror_paths: Vec<_> = match fs::read_dir(&mirror_dir) {
        Ok(read_dir) => read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect(),
        Err(_) => Vec::new(),
    };
    mirror_paths.sort();

    let mut lines = Vec::new();
    for path in &mirror_paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        let first_line = strip_frontmatter(&content)
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
            .trim_start_matches('#')
            .trim();
        lines.push(format!("- {stem}: {first_line}"));
    }

    if !lines.is_empty() {
        summary.push('\n');
        summary.push_str(&lines.join("\n"));
        summary.push('\n');
    }

    Ok(summary.trim_end().to_string())
}
