use super::helpers::{notebook_index, section_location};
use crate::model::{Section, SidebarItem, Snapshot, DEFAULT_SECTION_TITLE, SECTION_COLORS};

/// Appends a new top-level section to a notebook and makes it active.
pub fn add(mut snapshot: Snapshot, notebook_id: &str) -> (Snapshot, Option<String>) {
    let Some(ni) = notebook_index(&snapshot, notebook_id) else {
        return (snapshot, None);
    };

    let notebook = &mut snapshot.notebooks[ni];
    let color = SECTION_COLORS[notebook.sections.len() % SECTION_COLORS.len()];
    let section = Section::new(DEFAULT_SECTION_TITLE, color);
    let id = section.id.clone();

    notebook.sidebar_order.push(SidebarItem::section(id.clone()));
    notebook.sections.push(section);

    snapshot.active_notebook_id = Some(notebook_id.to_string());
    snapshot.active_section_id = Some(id.clone());
    snapshot.active_page_id = None;
    (snapshot, Some(id))
}

/// Renames a section. Blank titles are ignored.
pub fn rename(mut snapshot: Snapshot, section_id: &str, title: &str) -> Snapshot {
    let title = title.trim();
    if title.is_empty() {
        return snapshot;
    }
    if let Some((ni, si)) = section_location(&snapshot, section_id) {
        snapshot.notebooks[ni].sections[si].title = title.to_string();
    }
    snapshot
}

/// Removes a section (with its pages) and its sidebar entry.
pub fn delete(mut snapshot: Snapshot, section_id: &str) -> Snapshot {
    let Some((ni, si)) = section_location(&snapshot, section_id) else {
        return snapshot;
    };

    let notebook = &mut snapshot.notebooks[ni];
    let removed = notebook.sections.remove(si);
    notebook.sidebar_order.retain(|item| item.id != section_id);

    if snapshot.active_section_id.as_deref() == Some(section_id) {
        snapshot.active_section_id = None;
    }
    let active_page_removed = snapshot
        .active_page_id
        .as_deref()
        .is_some_and(|pid| removed.page(pid).is_some());
    if active_page_removed {
        snapshot.active_page_id = None;
    }
    snapshot
}
