//! # Blob Storage
//!
//! binder persists one serialized blob per storage key. This module defines
//! how the blob travels, not what is in it: [`BlobStore`] moves opaque strings
//! in and out, while [`crate::persist::Persistence`] owns decoding, migration
//! and the fallback to a seeded notebook.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file per key under a data directory.
//! - [`mem_backend::MemBackend`]: in-memory, for tests, with write-error
//!   simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! └── notebinder_persistence_v1.json   # the whole snapshot
//! ```
//!
//! The key carries the schema version. A future incompatible shape gets a new
//! key rather than an in-place rewrite.

use crate::error::Result;
use std::path::PathBuf;

pub mod fs_backend;
pub mod mem_backend;

/// Raw blob transport.
pub trait BlobStore {
    /// Reads the blob stored under `key`.
    /// Returns `Ok(None)` when nothing has been stored yet; `Err` only on
    /// actual I/O failures.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `blob` under `key`, replacing any previous value.
    /// MUST be atomic: a reader sees either the old blob or the new one.
    fn write(&self, key: &str, blob: &str) -> Result<()>;

    /// Where the blob for `key` lives. A virtual path for non-file backends.
    fn location(&self, key: &str) -> PathBuf;
}
