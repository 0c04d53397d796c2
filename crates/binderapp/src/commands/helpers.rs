//! Index lookups into a [`Snapshot`].
//!
//! The command layer mutates an owned snapshot through positions rather than
//! long-lived `&mut` borrows, so a lookup miss can hand the snapshot straight
//! back to the caller.

use crate::model::Snapshot;

pub(crate) fn notebook_index(snapshot: &Snapshot, notebook_id: &str) -> Option<usize> {
    snapshot.notebooks.iter().position(|nb| nb.id == notebook_id)
}

/// `(notebook, section)` position of a section.
pub(crate) fn section_location(snapshot: &Snapshot, section_id: &str) -> Option<(usize, usize)> {
    snapshot.notebooks.iter().enumerate().find_map(|(ni, nb)| {
        nb.sections
            .iter()
            .position(|s| s.id == section_id)
            .map(|si| (ni, si))
    })
}

/// `(notebook, group)` position of a section group.
pub(crate) fn group_location(snapshot: &Snapshot, group_id: &str) -> Option<(usize, usize)> {
    snapshot.notebooks.iter().enumerate().find_map(|(ni, nb)| {
        nb.section_groups
            .iter()
            .position(|g| g.id == group_id)
            .map(|gi| (ni, gi))
    })
}

/// `(notebook, section, page)` position of a page.
pub(crate) fn page_location(snapshot: &Snapshot, page_id: &str) -> Option<(usize, usize, usize)> {
    snapshot.notebooks.iter().enumerate().find_map(|(ni, nb)| {
        nb.sections.iter().enumerate().find_map(|(si, sec)| {
            sec.pages
                .iter()
                .position(|p| p.id == page_id)
                .map(|pi| (ni, si, pi))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture;

    #[test]
    fn locates_entities() {
        let fx = fixture();
        assert_eq!(notebook_index(&fx.snapshot, &fx.notebook_id), Some(0));
        assert_eq!(section_location(&fx.snapshot, &fx.section_b), Some((0, 1)));
        assert_eq!(group_location(&fx.snapshot, &fx.group_id), Some((0, 0)));
        assert_eq!(page_location(&fx.snapshot, &fx.pages[1]), Some((0, 0, 1)));
        assert_eq!(page_location(&fx.snapshot, "missing"), None);
    }
}
