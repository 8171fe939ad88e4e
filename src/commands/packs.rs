//! Packs command - discover packs across namespace roots.

use crate::config;
use crate::pack::PackManifest;
use crate::scan;
use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct PackListing {
    name: String,
    purpose: String,
    root: PathBuf,
}

pub fn packs(namespaces: Vec<PathBuf>, json: bool) -> Result<()> {
    let namespaces = if namespaces.is_empty() {
        match config::load_config(&std::env::current_dir()?)? {
            Some(config) if !config.namespaces.is_empty() => config.namespaces,
            _ => bail!(
                "No namespaces given. Pass directories as arguments or list them \
                 under `namespaces` in {}.",
                config::CONFIG_FILE
            ),
        }
    } else {
        namespaces
    };

    let roots = scan::find_packs(&namespaces);

    let mut listings = Vec::new();
    for root in roots {
        // find_packs only returns directories that already passed the
        // manifest predicate, so a load failure here is a race with an
        // external writer; skip rather than abort the listing.
        match PackManifest::load(&root) {
            Ok(manifest) => listings.push(PackListing {
                name: manifest.name,
                purpose: manifest.purpose,
                root,
            }),
            Err(e) => tracing::warn!("skipping {}: {e:#}", root.display()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("{} No packs found.", "─".dimmed());
        return Ok(());
    }

    for listing in &listings {
        println!(
            "{} {} - {} ({})",
            "●".cyan(),
            listing.name.bold(),
            listing.purpose,
            listing.root.display().to_string().dimmed()
        );
    }

    Ok(())
}
