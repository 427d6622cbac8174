//! Configuration types for runlog.
//!
//! [`Config::load`] reads `~/.config/runlog/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, and lets `RUNLOG_*`
//! environment variables override individual keys
//! (`RUNLOG_STORAGE__DATA_DIR=/tmp/runs`). [`Config::defaults`] returns the
//! same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, RunlogError};
use crate::store::{StoreLayout, DEFAULT_BACKUP_PREFIX, DEFAULT_RECORDS_FILE};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[storage]
# data_dir    = "/path/to/runlog"   # defaults to $XDG_DATA_HOME/runlog
records_file  = "running-data.json"
backup_prefix = "running-data-backup"

[seed]
# app_root   = "/path/to/app"       # defaults to the working directory
candidates = ["data/running-data.json", "dist/data/running-data.json"]
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/runlog/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// `[storage]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_records_file")]
    pub records_file: String,
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,
}

fn default_records_file() -> String { DEFAULT_RECORDS_FILE.to_string() }
fn default_backup_prefix() -> String { DEFAULT_BACKUP_PREFIX.to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            records_file: default_records_file(),
            backup_prefix: default_backup_prefix(),
        }
    }
}

/// `[seed]` section of `config.toml`.
///
/// Candidates are tried in order; relative entries resolve against
/// `app_root`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub app_root: Option<PathBuf>,
    #[serde(default = "default_seed_candidates")]
    pub candidates: Vec<String>,
}

fn default_seed_candidates() -> Vec<String> {
    vec![
        "data/running-data.json".to_string(),
        "dist/data/running-data.json".to_string(),
    ]
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            app_root: None,
            candidates: default_seed_candidates(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/runlog/config.toml`, layered on top of the
    /// built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from an explicit file. Creates the file with defaults if it does
    /// not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| RunlogError::io(parent, e))?;
            }
            std::fs::write(path, DEFAULT_CONFIG.trim_start())
                .map_err(|e| RunlogError::io(path, e))?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("RUNLOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Directory holding the record file and its backups.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Resolve the on-disk layout the record store operates on.
    pub fn store_layout(&self) -> StoreLayout {
        let app_root = self
            .seed
            .app_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        StoreLayout {
            dir: self.data_dir(),
            records_file: self.storage.records_file.clone(),
            backup_prefix: self.storage.backup_prefix.clone(),
            seed_candidates: self
                .seed
                .candidates
                .iter()
                .map(|candidate| app_root.join(candidate))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("runlog")
        .join("config.toml")
}

fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("runlog")
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
