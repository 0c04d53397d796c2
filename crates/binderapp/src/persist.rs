//! Loading and saving the snapshot blob.
//!
//! [`Persistence::load`] never fails. Whatever goes wrong (no blob yet, an
//! unreadable file, malformed JSON, a shape even migration cannot fix) ends in
//! the seeded notebook, with a warning in the log. [`Persistence::save`] does
//! return errors; the store reports them and keeps its in-memory state.

use crate::commands::selection;
use crate::error::Result;
use crate::migrate::migrate;
use crate::model::{Notebook, Page, Section, SidebarItem, Snapshot};
use crate::store::BlobStore;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Versioned key the snapshot blob is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "notebinder_persistence_v1";

pub const SEED_NOTEBOOK_TITLE: &str = "My Notebook";
pub const SEED_SECTION_TITLE: &str = "Quick Notes";
pub const SEED_SECTION_COLOR: &str = "#8b5cf6";

pub struct Persistence<B: BlobStore> {
    backend: B,
    key: String,
}

impl<B: BlobStore> Persistence<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location(&self.key)
    }

    /// Loads the stored snapshot, migrating older shapes, or falls back to the
    /// seed. Dangling selection pointers are repaired either way.
    pub fn load(&self) -> Snapshot {
        let blob = match self.backend.read(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.key, "no stored notebooks, starting from seed");
                return seed();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored notebooks unreadable, starting from seed");
                return seed();
            }
        };

        match decode(&blob) {
            Ok((snapshot, migrated)) => {
                if migrated {
                    info!(key = %self.key, "migrated stored notebooks to the current schema");
                }
                selection::repair(snapshot)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored notebooks malformed, starting from seed");
                seed()
            }
        }
    }

    /// Writes the structural snapshot. Transient UI state never reaches here.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let blob = serde_json::to_string_pretty(snapshot)?;
        self.backend.write(&self.key, &blob)
    }
}

/// Parses and migrates a blob. The flag tells whether migration changed it.
pub fn decode(blob: &str) -> Result<(Snapshot, bool)> {
    let mut value: Value = serde_json::from_str(blob)?;
    let migrated = migrate(&mut value);
    let snapshot = serde_json::from_value(value)?;
    Ok((snapshot, migrated))
}

/// The starting hierarchy: one notebook, one section, one blank page, all
/// selected.
pub fn seed() -> Snapshot {
    let page = Page::new();
    let mut section = Section::new(SEED_SECTION_TITLE, SEED_SECTION_COLOR);
    let mut notebook = Notebook::new(SEED_NOTEBOOK_TITLE);

    let page_id = page.id.clone();
    let section_id = section.id.clone();
    let notebook_id = notebook.id.clone();

    section.pages.push(page);
    notebook.sidebar_order.push(SidebarItem::section(&section_id));
    notebook.sections.push(section);

    Snapshot {
        notebooks: vec![notebook],
        active_notebook_id: Some(notebook_id),
        active_section_id: Some(section_id),
        active_page_id: Some(page_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::fixture;

    fn assert_seeded(snapshot: &Snapshot) {
        assert_eq!(snapshot.notebooks.len(), 1);
        let notebook = &snapshot.notebooks[0];
        assert_eq!(notebook.title, SEED_NOTEBOOK_TITLE);
        assert_eq!(notebook.sections[0].title, SEED_SECTION_TITLE);
        assert_eq!(notebook.sections[0].pages.len(), 1);
        assert!(snapshot.active_page().is_some());
    }

    #[test]
    fn seed_is_fully_selected() {
        let snapshot = seed();
        assert_seeded(&snapshot);
        let page = snapshot.active_page().unwrap();
        assert!(page.title.is_empty());
        assert_eq!(page.copy_areas.len(), 1);
        assert_eq!(
            snapshot.active_section().unwrap().color,
            SEED_SECTION_COLOR
        );
    }

    #[test]
    fn missing_blob_loads_seed() {
        let persistence = Persistence::new(MemBackend::new(), DEFAULT_STORAGE_KEY);
        assert_seeded(&persistence.load());
    }

    #[test]
    fn malformed_blob_loads_seed() {
        for blob in ["{not json", "[]", r#"{"notebooks": 3}"#] {
            let persistence =
                Persistence::new(MemBackend::with_blob(DEFAULT_STORAGE_KEY, blob), DEFAULT_STORAGE_KEY);
            assert_seeded(&persistence.load());
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let persistence = Persistence::new(MemBackend::new(), DEFAULT_STORAGE_KEY);
        let snapshot = fixture().snapshot;
        persistence.save(&snapshot).unwrap();
        assert_eq!(persistence.load(), snapshot);
    }

    #[test]
    fn load_repairs_dangling_selection() {
        let mut snapshot = fixture().snapshot;
        snapshot.active_page_id = Some("gone".into());
        let persistence = Persistence::new(MemBackend::new(), DEFAULT_STORAGE_KEY);
        persistence.save(&snapshot).unwrap();
        assert_eq!(persistence.load().active_page_id.as_deref(), Some("pg-a"));
    }

    #[test]
    fn decode_reports_migration() {
        let blob = serde_json::to_string(&fixture().snapshot).unwrap();
        assert!(!decode(&blob).unwrap().1);

        let legacy = r#"{"notebooks":[{"id":"nb","title":"N","sections":[]}]}"#;
        let (snapshot, migrated) = decode(legacy).unwrap();
        assert!(migrated);
        assert!(snapshot.notebooks[0].section_groups.is_empty());
    }

    #[test]
    fn save_surfaces_backend_errors() {
        let persistence = Persistence::new(MemBackend::new(), DEFAULT_STORAGE_KEY);
        persistence.backend().set_simulate_write_error(true);
        assert!(persistence.save(&seed()).is_err());
        assert_eq!(persistence.backend().blob(DEFAULT_STORAGE_KEY), None);
    }
}
