//! Project configuration (`xtform.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    /// Workspace root containing `components/registry.yml`
    #[serde(default = "default_registry_root")]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct CheckConfig {
    /// Directories searched when `check` is given no paths
    #[serde(default = "default_check_dirs")]
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    /// Quiet period before a changed file is re-checked
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_registry_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_check_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}
fn default_debounce_ms() -> u64 {
    500
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root: default_registry_root(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            dirs: default_check_dirs(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
