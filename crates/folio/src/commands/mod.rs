//! CLI subcommands and the shared config file loader.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_render::RenderConfig;

pub mod check;
pub mod css;
pub mod init;
pub mod render;

/// Configuration file structure (folio.toml).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Where `folio check` looks when no directory is given
    pub content_dir: PathBuf,

    #[serde(flatten)]
    pub render: RenderConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            render: RenderConfig::default(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
