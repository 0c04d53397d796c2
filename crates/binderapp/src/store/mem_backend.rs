use super::BlobStore;
use crate::error::{BinderError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory blob storage for tests.
///
/// binder is single-threaded, so `RefCell` gives the `&self` trait methods
/// their interior mutability.
#[derive(Default)]
pub struct MemBackend {
    blobs: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out holding `blob` under `key`.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.blobs.borrow_mut().insert(key.to_string(), blob.into());
        backend
    }

    /// Makes every following write fail until switched off again.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl BlobStore for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blob(key))
    }

    fn write(&self, key: &str, blob: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BinderError::Store("Simulated write error".to_string()));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn location(&self, key: &str) -> PathBuf {
        PathBuf::from(format!("memory://{key}"))
    }
}
