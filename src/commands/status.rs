//! Status command - render the freshness tree of a pack.

use crate::freshness::{self, ItemState, PackFreshness, PackState};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn status(pack_root: &Path, json: bool) -> Result<()> {
    let report = freshness::assess(pack_root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_pack(&report, 0);

    let deep = report.deep_state();
    println!();
    println!("Deep state: {}", state_label(deep));

    Ok(())
}

fn print_pack(pack: &PackFreshness, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} [{}]",
        pack_glyph(pack.state),
        pack.pack_root.display().to_string().bold(),
        state_label(pack.state)
    );

    for item in &pack.items {
        let name = if item.is_composite {
            format!("{}/", item.name)
        } else {
            item.name.clone()
        };
        println!("{indent}  {} {}", item_glyph(item.state), name);
    }

    for child in &pack.children {
        print_pack(child, depth + 1);
    }
}

fn item_glyph(state: ItemState) -> String {
    match state {
        ItemState::Clean => "✓".green().to_string(),
        ItemState::Dirty => "⚠".yellow().to_string(),
        ItemState::Absent => "○".dimmed().to_string(),
        ItemState::Orphan => "✗".red().to_string(),
    }
}

fn pack_glyph(state: PackState) -> String {
    match state {
        PackState::Clean => "✓".green().to_string(),
        PackState::Dirty => "⚠".yellow().to_string(),
        PackState::Absent => "○".dimmed().to_string(),
        PackState::Corrupt => "✗".red().bold().to_string(),
    }
}

fn state_label(state: PackState) -> String {
    match state {
        PackState::Clean => state.to_string().green().to_string(),
        PackState::Dirty => state.to_string().yellow().to_string(),
        PackState::Absent => state.to_string().dimmed().to_string(),
        PackState::Corrupt => state.to_string().red().bold().to_string(),
    }
}
