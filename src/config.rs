//! Store configuration.
//!
//! Only the knobs the data layer itself needs: where the database lives and
//! how many read connections to pool. Process startup and CLI wiring belong
//! to the embedding application.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,
}

fn default_read_pool_size() -> usize {
    DEFAULT_READ_POOL_SIZE
}

impl StoreConfig {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        StoreConfig {
            db_path: db_path.as_ref().to_path_buf(),
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }

    /// Load the config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
