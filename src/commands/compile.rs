//! Compile command - reconcile a pack with the built-in outline compiler.

use crate::compile::{reconcile, OutlineCompiler};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn compile(pack_root: &Path, shallow: bool, quiet: bool) -> Result<()> {
    let compiler = OutlineCompiler;
    let report = reconcile(pack_root, &compiler, !shallow)?;

    if quiet {
        return Ok(());
    }

    if report.compiled_items.is_empty() && report.deleted_orphans.is_empty() {
        println!("{} Nothing to do, pack is {}", "─".dimmed(), "clean".green());
        return Ok(());
    }

    for orphan in &report.deleted_orphans {
        println!("{} deleted orphan mirror {}", "✗".red(), orphan.cyan());
    }
    for item in &report.compiled_items {
        println!("{} compiled {}", "✓".green().bold(), item.cyan());
    }

    println!();
    println!(
        "{} -> {} ({} compiled, {} deleted)",
        report.state_before.to_string().yellow(),
        report.state_after.to_string().green(),
        report.compiled_items.len(),
        report.deleted_orphans.len()
    );

    Ok(())
}
