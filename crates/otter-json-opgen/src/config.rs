//! Configuration file parsing for opgen.toml.

use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Listing output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Listing format
    #[serde(default)]
    pub format: OutputFormat,

    /// Write the listing here instead of stdout
    pub path: Option<PathBuf>,

    /// Include the indent twins
    #[serde(default = "default_true")]
    pub include_indent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: None,
            include_indent: true,
        }
    }
}

/// Listing format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per instruction
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

fn default_true() -> bool {
    true
}

/// Load configuration from a file or search for default config files.
///
/// An explicitly given path must exist; a missing discovered file falls back
/// to the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(path) if !path.exists() => {
            anyhow::bail!("Config file {} does not exist", path.display())
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::debug!("Loaded config from {:?}", path);
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Search for configuration file in the current directory and parent directories.
fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_ancestors(&cwd)
}

fn find_config_in_ancestors(start: &Path) -> Option<PathBuf> {
    const CONFIG_NAMES: &[&str] = &["opgen.toml", ".opgenrc.toml"];

    let mut dir = Some(start);
    while let Some(current) = dir {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.exists() {
                return Some(path);
            }
        }
        dir = current.parent();
    }

    None
}
