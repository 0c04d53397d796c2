use super::BlobStore;
use crate::error::{BinderError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each blob as `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BinderError::Io)?;
        }
        Ok(())
    }
}

impl BlobStore for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.location(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(BinderError::Io(err)),
        }
    }

    fn write(&self, key: &str, blob: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.location(key);

        // Atomic write: a crash mid-write leaves the old blob in place.
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, blob).map_err(BinderError::Io)?;
        fs::rename(&tmp, target).map_err(BinderError::Io)?;
        Ok(())
    }

    fn location(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}
