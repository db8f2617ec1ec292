//! Store location for the `ps` binary
//!
//! `ps` reads the same YAML file as `dp` and only looks at
//! `storage.store-dir`, so both binaries agree on where records live.

use eyre::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local config file name, shared with `dp`
const LOCAL_CONFIG: &str = ".dietplanner.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageSection {
    /// Path to the store directory
    pub store_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            store_dir: default_store_path(),
        }
    }
}

/// Default store location, shared with the `dp` binary
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dietplanner")
        .join("store")
}

impl Config {
    /// Load config with fallback chain
    ///
    /// Explicit path, then `./.dietplanner.yml`, then
    /// `<config_dir>/dietplanner/dietplanner.yml`, then defaults. Other
    /// sections of the file are ignored.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::from_file(config_path);
        }

        let candidates = [
            Some(PathBuf::from(LOCAL_CONFIG)),
            dirs::config_dir().map(|p| p.join("dietplanner").join("dietplanner.yml")),
        ];
        for candidate in candidates.iter().flatten() {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }

        debug!("Config::load: no config file, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context(format!("Failed to read config {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&content).context(format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), store_dir = %config.storage.store_dir.display(), "Config::from_file: loaded");
        Ok(config)
    }

    /// Store directory to open; `--store` wins over the config file
    pub fn store_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override.unwrap_or_else(|| self.storage.store_dir.clone())
    }
}
