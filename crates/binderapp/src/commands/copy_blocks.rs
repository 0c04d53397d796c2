use super::helpers::page_location;
use super::CopyBlockUpdate;
use crate::model::{CopyBlock, Snapshot};

/// Appends an empty copy block to a page.
pub fn add(mut snapshot: Snapshot, page_id: &str) -> (Snapshot, Option<String>) {
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return (snapshot, None);
    };

    let block = CopyBlock::new();
    let id = block.id.clone();
    let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
    page.copy_areas.push(block);
    page.touch();
    (snapshot, Some(id))
}

/// Merges fields over a copy block; the owning page's `last_modified` is
/// refreshed.
pub fn update(
    mut snapshot: Snapshot,
    page_id: &str,
    block_id: &str,
    update: CopyBlockUpdate,
) -> Snapshot {
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return snapshot;
    };

    let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
    let Some(block) = page.copy_areas.iter_mut().find(|b| b.id == block_id) else {
        return snapshot;
    };
    if let Some(title) = update.title {
        block.title = title;
    }
    if let Some(content) = update.content {
        block.content = content;
    }
    page.touch();
    snapshot
}

/// Removes a copy block. A page always keeps at least one block, so deleting
/// the last one does nothing.
pub fn delete(mut snapshot: Snapshot, page_id: &str, block_id: &str) -> Snapshot {
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return snapshot;
    };

    let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
    if page.copy_areas.len() <= 1 {
        return snapshot;
    }
    let before = page.copy_areas.len();
    page.copy_areas.retain(|b| b.id != block_id);
    if page.copy_areas.len() != before {
        page.touch();
    }
    snapshot
}
