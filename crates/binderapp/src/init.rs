//! # Initialization
//!
//! Builds a ready-to-use [`NotebookStore`] on the filesystem backend.
//!
//! ## Data Directory Resolution
//!
//! The first of these wins:
//!
//! 1. The `data_override` argument (the CLI's `--data` flag).
//! 2. `data_dir` from the configuration (`binder.toml` or `BINDER_DATA_DIR`).
//! 3. The OS-appropriate data directory (via the `directories` crate), e.g.
//!    `~/.local/share/notebinder` on Linux.
//!
//! The snapshot blob lives in that directory as `<storage_key>.json`.

use crate::api::NotebookStore;
use crate::config::BinderConfig;
use crate::error::{BinderError, Result};
use crate::persist::Persistence;
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "binder.toml";

pub struct BinderContext {
    pub store: NotebookStore<FsBackend>,
    pub config: BinderConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "notebinder", "notebinder")
}

/// Location of `binder.toml`, when the platform has a config directory.
pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// The platform data directory for binder.
pub fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BinderError::Store("Could not determine a data directory".to_string()))
}

pub fn resolve_data_dir(data_override: Option<&Path>, config: &BinderConfig) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.data_dir {
        return Ok(path.clone());
    }
    default_data_dir()
}

/// Loads the configuration, resolves the data directory and opens the store.
pub fn initialize(data_override: Option<PathBuf>) -> Result<BinderContext> {
    let config = BinderConfig::load(config_file().as_deref())?;
    initialize_with(data_override, config)
}

/// Like [`initialize`], with an already loaded configuration.
pub fn initialize_with(data_override: Option<PathBuf>, config: BinderConfig) -> Result<BinderContext> {
    let data_dir = resolve_data_dir(data_override.as_deref(), &config)?;
    debug!(data_dir = %data_dir.display(), key = %config.storage_key, "opening notebook store");

    let persistence = Persistence::new(FsBackend::new(&data_dir), config.storage_key.clone());
    let store = NotebookStore::new(persistence, config.search_options());

    Ok(BinderContext {
        store,
        config,
        data_dir,
    })
}
