//! Optional `kiln.toml` configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "kiln.toml";

/// Tool configuration.
///
/// `namespaces` are the default discovery roots used by `kiln packs` when no
/// namespaces are given on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub namespaces: Vec<PathBuf>,
}

/// Load `kiln.toml` from a directory.
///
/// A missing file is not an error; a malformed one is.
pub fn load_config(dir: &Path) -> Result<Option<Config>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(config))
}
