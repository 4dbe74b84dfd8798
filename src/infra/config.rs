// ============================================================
// Layer 6 — Data Configuration
// ============================================================
// Where datasets and caches live. Read from an optional JSON
// file; anything missing falls back to the defaults:
//
//   {
//     "cur_data_dir": "data",
//     "cache_dir":    "."
//   }
//
// Command-line flags override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root holding one directory per character type.
    pub cur_data_dir: PathBuf,
    /// Directory for cached character lists and paired datasets.
    pub cache_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cur_data_dir: PathBuf::from("data"),
            cache_dir:    PathBuf::from("."),
        }
    }
}

impl DataConfig {
    /// Load from `path`, or return the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;

        tracing::debug!("Loaded data config from '{}': {:?}", path.display(), cfg);
        Ok(cfg)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, cache_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.cur_data_dir = dir;
        }
        if let Some(dir) = cache_dir {
            self.cache_dir = dir;
        }
        self
    }
}
