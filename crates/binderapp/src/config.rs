//! # Configuration
//!
//! binder configuration is loaded with [`confique`] from, in priority order:
//!
//! 1. **Environment variables**: `BINDER_STORAGE_KEY`, `BINDER_PREVIEW_RADIUS`,
//!    `BINDER_DATA_DIR`.
//! 2. **Config file**: `binder.toml` in the OS config directory (via the
//!    `directories` crate, see [`crate::init::config_file`]).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_key` | `notebinder_persistence_v1` | Versioned key of the snapshot blob |
//! | `preview_radius` | `20` | Chars of context on each side of a search preview |
//! | `data_dir` | *(platform data dir)* | Where the snapshot blob is stored |

use crate::commands::search::{SearchOptions, DEFAULT_PREVIEW_RADIUS};
use crate::error::Result;
use crate::persist::DEFAULT_STORAGE_KEY;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for binder, stored in `binder.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    /// Key the snapshot blob is stored under. Changing it starts a fresh
    /// notebook set without touching the old one.
    #[config(default = "notebinder_persistence_v1", env = "BINDER_STORAGE_KEY")]
    pub storage_key: String,

    /// Chars of context kept on each side of a search match.
    #[config(default = 20, env = "BINDER_PREVIEW_RADIUS")]
    pub preview_radius: usize,

    /// Overrides the data directory.
    #[config(env = "BINDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            preview_radius: DEFAULT_PREVIEW_RADIUS,
            data_dir: None,
        }
    }
}

impl BinderConfig {
    /// Loads environment overrides over `config_file` (skipped when absent)
    /// over the defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = config_file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            preview_radius: self.preview_radius,
        }
    }
}
