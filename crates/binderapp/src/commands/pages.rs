use super::helpers::{page_location, section_location};
use super::PageUpdate;
use crate::model::{CopyBlock, Page, Snapshot};

/// Appends a blank page to a section and makes it the active page.
pub fn add(mut snapshot: Snapshot, section_id: &str) -> (Snapshot, Option<String>) {
    let Some((ni, si)) = section_location(&snapshot, section_id) else {
        return (snapshot, None);
    };

    let page = Page::new();
    let id = page.id.clone();
    snapshot.notebooks[ni].sections[si].pages.push(page);

    snapshot.active_notebook_id = Some(snapshot.notebooks[ni].id.clone());
    snapshot.active_section_id = Some(section_id.to_string());
    snapshot.active_page_id = Some(id.clone());
    (snapshot, Some(id))
}

/// Merges the supplied fields over an existing page and refreshes
/// `last_modified`. Unknown ids are ignored. An empty copy-block list is
/// replaced by a single empty block.
pub fn update(mut snapshot: Snapshot, page_id: &str, update: PageUpdate) -> Snapshot {
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return snapshot;
    };

    let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
    if let Some(title) = update.title {
        page.title = title;
    }
    if let Some(content) = update.content {
        page.content = content;
    }
    if let Some(copy_areas) = update.copy_areas {
        page.copy_areas = if copy_areas.is_empty() {
            vec![CopyBlock::new()]
        } else {
            copy_areas
        };
    }
    if let Some(is_subpage) = update.is_subpage {
        page.is_subpage = is_subpage;
    }
    page.touch();
    snapshot
}

/// Removes a page. If it was active, the first remaining page of the same
/// section takes over, or nothing when the section is now empty.
pub fn delete(mut snapshot: Snapshot, page_id: &str) -> Snapshot {
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return snapshot;
    };

    let section = &mut snapshot.notebooks[ni].sections[si];
    section.pages.remove(pi);
    let fallback = section.pages.first().map(|p| p.id.clone());

    if snapshot.active_page_id.as_deref() == Some(page_id) {
        snapshot.active_page_id = fallback;
    }
    snapshot
}

/// Flips a page between lead page and subpage.
pub fn toggle_subpage(mut snapshot: Snapshot, page_id: &str) -> Snapshot {
    if let Some((ni, si, pi)) = page_location(&snapshot, page_id) {
        let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
        page.is_subpage = !page.is_subpage;
    }
    snapshot
}
