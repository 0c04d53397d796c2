//! Drag-and-drop reordering of pages and copy blocks.
//!
//! Both use the same splice: remove the dragged run, find the target in what
//! is left, insert before or after it. If the target is gone (for example it
//! was part of the dragged run) the run goes to the end. Nothing is ever
//! dropped.
//!
//! Pages move as **blocks**: a lead page drags its contiguous subpages along.

use super::helpers::{page_location, section_location};
use crate::model::{DropPosition, Page, Snapshot};
use std::ops::Range;

/// Index range of the block starting at `page_id`: the page itself plus every
/// immediately following subpage.
pub fn page_block(pages: &[Page], page_id: &str) -> Option<Range<usize>> {
    let start = pages.iter().position(|p| p.id == page_id)?;
    let subpages = pages[start + 1..]
        .iter()
        .take_while(|p| p.is_subpage)
        .count();
    Some(start..start + 1 + subpages)
}

/// Moves `items[range]` next to the first remaining item matching
/// `is_target`, or to the end when none matches. Order within the range is
/// kept.
pub fn move_range<T>(
    items: &mut Vec<T>,
    range: Range<usize>,
    is_target: impl Fn(&T) -> bool,
    position: DropPosition,
) {
    let moved: Vec<T> = items.drain(range).collect();
    let index = match items.iter().position(is_target) {
        Some(pos) if position == DropPosition::Before => pos,
        Some(pos) => pos + 1,
        None => items.len(),
    };
    items.splice(index..index, moved);
}

pub fn reorder_pages(
    mut snapshot: Snapshot,
    section_id: &str,
    dragged_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Snapshot {
    if dragged_id == target_id {
        return snapshot;
    }
    let Some((ni, si)) = section_location(&snapshot, section_id) else {
        return snapshot;
    };

    let pages = &mut snapshot.notebooks[ni].sections[si].pages;
    if let Some(block) = page_block(pages, dragged_id) {
        move_range(pages, block, |p| p.id == target_id, position);
    }
    snapshot
}

/// Reorders copy blocks within a page. Each block moves on its own.
pub fn reorder_copy_areas(
    mut snapshot: Snapshot,
    page_id: &str,
    dragged_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Snapshot {
    if dragged_id == target_id {
        return snapshot;
    }
    let Some((ni, si, pi)) = page_location(&snapshot, page_id) else {
        return snapshot;
    };

    let page = &mut snapshot.notebooks[ni].sections[si].pages[pi];
    let Some(from) = page.copy_areas.iter().position(|b| b.id == dragged_id) else {
        return snapshot;
    };
    move_range(
        &mut page.copy_areas,
        from..from + 1,
        |b| b.id == target_id,
        position,
    );
    page.touch();
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture, page_ids};
    use DropPosition::{After, Before};

    fn sorted(mut ids: Vec<String>) -> Vec<String> {
        ids.sort();
        ids
    }

    fn block_ids(snapshot: &Snapshot, page_id: &str) -> Vec<String> {
        snapshot
            .find_page(page_id)
            .map(|(_, p)| p.copy_areas.iter().map(|b| b.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn page_block_spans_trailing_subpages() {
        let fx = fixture();
        let pages = &fx.snapshot.find_section("sec-a").unwrap().1.pages;
        assert_eq!(page_block(pages, "pg-a"), Some(0..3));
        assert_eq!(page_block(pages, "pg-b"), Some(1..3));
        assert_eq!(page_block(pages, "pg-c"), Some(2..3));
        assert_eq!(page_block(pages, "pg-d"), Some(3..4));
        assert_eq!(page_block(pages, "nope"), None);
    }

    #[test]
    fn move_range_appends_when_target_missing() {
        let mut items = vec![1, 2, 3, 4];
        move_range(&mut items, 0..2, |&x| x == 2, Before);
        assert_eq!(items, vec![3, 4, 1, 2]);
    }

    #[test]
    fn lead_page_moves_with_its_subpages() {
        let fx = fixture();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-a", "pg-d", After);
        assert_eq!(page_ids(&next, "sec-a"), vec!["pg-d", "pg-a", "pg-b", "pg-c"]);
    }

    #[test]
    fn page_dropped_before_a_block() {
        let fx = fixture();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-d", "pg-a", Before);
        assert_eq!(page_ids(&next, "sec-a"), vec!["pg-d", "pg-a", "pg-b", "pg-c"]);
    }

    #[test]
    fn dragging_a_subpage_takes_only_what_follows_it() {
        // The run always starts at the dragged page: pg-b carries pg-c, never pg-a.
        let fx = fixture();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-b", "pg-d", After);
        assert_eq!(page_ids(&next, "sec-a"), vec!["pg-a", "pg-d", "pg-b", "pg-c"]);

        let fx = fixture();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-c", "pg-a", Before);
        assert_eq!(page_ids(&next, "sec-a"), vec!["pg-c", "pg-a", "pg-b", "pg-d"]);
    }

    #[test]
    fn target_inside_dragged_block_falls_back_to_end() {
        let fx = fixture();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-a", "pg-c", Before);
        assert_eq!(page_ids(&next, "sec-a"), vec!["pg-d", "pg-a", "pg-b", "pg-c"]);
    }

    #[test]
    fn reorder_pages_no_ops() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        let next = reorder_pages(fx.snapshot, "sec-a", "pg-a", "pg-a", After);
        let next = reorder_pages(next, "sec-a", "nope", "pg-a", After);
        let next = reorder_pages(next, "nope", "pg-a", "pg-d", After);
        assert_eq!(next, before);
    }

    #[test]
    fn page_reorders_preserve_the_page_set() {
        let fx = fixture();
        let original = sorted(page_ids(&fx.snapshot, "sec-a"));
        let moves = [
            ("pg-d", "pg-b", Before),
            ("pg-c", "pg-a", After),
            ("pg-a", "pg-d", Before),
            ("pg-b", "nope", After),
            ("pg-d", "pg-c", After),
        ];
        let mut snapshot = fx.snapshot;
        for (dragged, target, position) in moves {
            snapshot = reorder_pages(snapshot, "sec-a", dragged, target, position);
            assert_eq!(sorted(page_ids(&snapshot, "sec-a")), original);
        }
    }

    #[test]
    fn copy_blocks_move_individually() {
        let fx = fixture();
        let next = reorder_copy_areas(fx.snapshot, "pg-e", "cb-1", "cb-3", After);
        assert_eq!(block_ids(&next, "pg-e"), vec!["cb-2", "cb-3", "cb-1"]);
        assert!(next.find_page("pg-e").unwrap().1.last_modified > 0);

        let next = reorder_copy_areas(next, "pg-e", "cb-3", "cb-2", Before);
        assert_eq!(block_ids(&next, "pg-e"), vec!["cb-3", "cb-2", "cb-1"]);
    }

    #[test]
    fn copy_block_with_missing_target_goes_last() {
        let fx = fixture();
        let next = reorder_copy_areas(fx.snapshot, "pg-e", "cb-1", "gone", Before);
        assert_eq!(block_ids(&next, "pg-e"), vec!["cb-2", "cb-3", "cb-1"]);
    }

    #[test]
    fn copy_block_reorder_unknown_dragged_is_noop() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        let next = reorder_copy_areas(fx.snapshot, "pg-e", "gone", "cb-1", Before);
        assert_eq!(next, before);
    }
}
