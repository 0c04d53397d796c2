//! Active notebook/section/page pointers.
//!
//! The pointers are plain ids on the [`Snapshot`] and may dangle after a
//! deletion or a bad load. Setters ignore ids that do not resolve, and
//! [`repair`] brings a loaded snapshot back to a consistent selection.

use crate::model::Snapshot;

/// Activates a notebook and resets the selection to its first top-level
/// section and that section's first page.
pub fn set_active_notebook(mut snapshot: Snapshot, notebook_id: &str) -> Snapshot {
    let Some(notebook) = snapshot.notebook(notebook_id) else {
        return snapshot;
    };

    let section = notebook.first_top_level_section();
    let section_id = section.map(|s| s.id.clone());
    let page_id = section.and_then(|s| s.pages.first()).map(|p| p.id.clone());

    snapshot.active_notebook_id = Some(notebook_id.to_string());
    snapshot.active_section_id = section_id;
    snapshot.active_page_id = page_id;
    snapshot
}

/// Activates a section (and its notebook); the active page becomes the
/// section's first page.
pub fn set_active_section(mut snapshot: Snapshot, section_id: &str) -> Snapshot {
    let Some((notebook, section)) = snapshot.find_section(section_id) else {
        return snapshot;
    };

    let notebook_id = notebook.id.clone();
    let page_id = section.pages.first().map(|p| p.id.clone());

    snapshot.active_notebook_id = Some(notebook_id);
    snapshot.active_section_id = Some(section_id.to_string());
    snapshot.active_page_id = page_id;
    snapshot
}

/// Activates a page together with its owning section and notebook.
pub fn set_active_page(mut snapshot: Snapshot, page_id: &str) -> Snapshot {
    let Some((section, _)) = snapshot.find_page(page_id) else {
        return snapshot;
    };
    let section_id = section.id.clone();
    let notebook_id = snapshot
        .find_section(&section_id)
        .map(|(nb, _)| nb.id.clone());

    snapshot.active_notebook_id = notebook_id;
    snapshot.active_section_id = Some(section_id);
    snapshot.active_page_id = Some(page_id.to_string());
    snapshot
}

/// Resolves dangling pointers:
///
/// - unknown notebook: first notebook, or `None` when there are none
/// - section outside the active notebook: `None`
/// - page outside the active section: that section's first page, or `None`
pub fn repair(mut snapshot: Snapshot) -> Snapshot {
    let notebook = snapshot.active_notebook();
    let notebook_id = notebook.map(|nb| nb.id.clone());

    let section = snapshot
        .active_section_id
        .as_deref()
        .and_then(|id| notebook.and_then(|nb| nb.section(id)));
    let section_id = section.map(|s| s.id.clone());

    let page_id = section.and_then(|sec| {
        snapshot
            .active_page_id
            .as_deref()
            .and_then(|id| sec.page(id))
            .or_else(|| sec.pages.first())
            .map(|p| p.id.clone())
    });

    snapshot.active_notebook_id = notebook_id;
    snapshot.active_section_id = section_id;
    snapshot.active_page_id = page_id;
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Notebook, Section, SidebarItem};
    use crate::test_utils::fixture;

    #[test]
    fn set_active_notebook_selects_first_top_level_section() {
        let mut fx = fixture();
        let mut other = Notebook::new("Other");
        let mut grouped = Section::new("Grouped", "#fff");
        grouped.group_id = Some("g".into());
        let top = Section::new("Top", "#fff");
        let top_id = top.id.clone();
        other.sidebar_order = vec![SidebarItem::section(&top_id)];
        other.sections = vec![grouped, top];
        let other_id = other.id.clone();
        fx.snapshot.notebooks.push(other);

        let next = set_active_notebook(fx.snapshot, &other_id);
        assert_eq!(next.active_notebook_id.as_deref(), Some(other_id.as_str()));
        assert_eq!(next.active_section_id.as_deref(), Some(top_id.as_str()));
        assert_eq!(next.active_page_id, None);
    }

    #[test]
    fn set_active_notebook_unknown_is_noop() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        assert_eq!(set_active_notebook(fx.snapshot, "nope"), before);
    }

    #[test]
    fn set_active_section_picks_first_page() {
        let fx = fixture();
        let next = set_active_section(fx.snapshot, &fx.section_b);
        assert_eq!(next.active_section_id.as_deref(), Some("sec-b"));
        assert_eq!(next.active_page_id.as_deref(), Some("pg-e"));

        let next = set_active_section(next, &fx.section_c);
        assert_eq!(next.active_section_id.as_deref(), Some("sec-c"));
        assert_eq!(next.active_page_id, None);
    }

    #[test]
    fn set_active_page_sets_owners() {
        let mut fx = fixture();
        fx.snapshot.active_section_id = None;
        let next = set_active_page(fx.snapshot, &fx.page_e);
        assert_eq!(next.active_notebook_id.as_deref(), Some("nb"));
        assert_eq!(next.active_section_id.as_deref(), Some("sec-b"));
        assert_eq!(next.active_page_id.as_deref(), Some("pg-e"));
    }

    #[test]
    fn repair_keeps_consistent_selection() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        assert_eq!(repair(fx.snapshot), before);
    }

    #[test]
    fn repair_resolves_dangling_pointers() {
        let mut fx = fixture();
        fx.snapshot.active_notebook_id = Some("gone".into());
        fx.snapshot.active_section_id = Some("sec-b".into());
        fx.snapshot.active_page_id = Some("pg-a".into());

        let next = repair(fx.snapshot);
        assert_eq!(next.active_notebook_id.as_deref(), Some("nb"));
        assert_eq!(next.active_section_id.as_deref(), Some("sec-b"));
        // pg-a lives in sec-a, so the section's first page takes over.
        assert_eq!(next.active_page_id.as_deref(), Some("pg-e"));
    }

    #[test]
    fn repair_clears_unknown_section() {
        let mut fx = fixture();
        fx.snapshot.active_section_id = Some("gone".into());
        let next = repair(fx.snapshot);
        assert_eq!(next.active_section_id, None);
        assert_eq!(next.active_page_id, None);
    }

    #[test]
    fn repair_on_empty_snapshot() {
        let next = repair(Snapshot::default());
        assert_eq!(next, Snapshot::default());
    }
}
