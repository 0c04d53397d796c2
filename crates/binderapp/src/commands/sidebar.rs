//! Top-level ordering of a notebook's sidebar and section group membership.
//!
//! Two primitives change the sidebar: [`reorder_items`] replaces the order
//! wholesale and [`move_section_to_group`] moves a section in or out of a
//! group. [`resolve_drop`] turns a drag-and-drop gesture into one of them, so
//! callers never build a new order by hand.

use super::helpers::{notebook_index, section_location};
use crate::model::{Notebook, SidebarItem, SidebarItemKind, Snapshot};

/// Where a dragged item was released relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Before,
    After,
    /// Onto a group (or a grouped section): join that group.
    Inside,
}

/// A resolved sidebar drop, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarCommand {
    MoveSectionToGroup {
        section_id: String,
        group_id: Option<String>,
        target_index: Option<usize>,
    },
    Reorder(Vec<SidebarItem>),
}

/// Replaces a notebook's sidebar order. The caller supplies a permutation of
/// the current entries.
pub fn reorder_items(mut snapshot: Snapshot, notebook_id: &str, order: Vec<SidebarItem>) -> Snapshot {
    if let Some(ni) = notebook_index(&snapshot, notebook_id) {
        snapshot.notebooks[ni].sidebar_order = order;
    }
    snapshot
}

/// Moves a section into `group_id`, or out to the top level when `group_id`
/// is `None`.
///
/// Leaving with a `target_index` places the entry there (clamped), which also
/// repositions a section that is already top-level. Leaving without an index
/// keeps an existing entry and appends a missing one.
pub fn move_section_to_group(
    mut snapshot: Snapshot,
    section_id: &str,
    group_id: Option<&str>,
    target_index: Option<usize>,
) -> Snapshot {
    let Some((ni, si)) = section_location(&snapshot, section_id) else {
        return snapshot;
    };
    let notebook = &mut snapshot.notebooks[ni];
    let is_entry =
        |item: &SidebarItem| item.id == section_id && item.kind == SidebarItemKind::Section;

    match group_id {
        Some(group_id) => {
            if notebook.group(group_id).is_none() {
                return snapshot;
            }
            notebook.sections[si].group_id = Some(group_id.to_string());
            notebook.sidebar_order.retain(|item| !is_entry(item));
        }
        None => {
            notebook.sections[si].group_id = None;
            let existing = notebook.sidebar_order.iter().position(is_entry);
            match (target_index, existing) {
                (Some(index), existing) => {
                    if let Some(pos) = existing {
                        notebook.sidebar_order.remove(pos);
                    }
                    let index = index.min(notebook.sidebar_order.len());
                    notebook
                        .sidebar_order
                        .insert(index, SidebarItem::section(section_id));
                }
                (None, Some(_)) => {}
                (None, None) => notebook.sidebar_order.push(SidebarItem::section(section_id)),
            }
        }
    }
    snapshot
}

/// Translates a sidebar drag-and-drop into a command.
///
/// Returns `None` when the drop changes nothing: an item dropped on itself,
/// unknown ids, a group dropped inside anything, or a section dropped into the
/// group it already belongs to.
pub fn resolve_drop(
    notebook: &Notebook,
    dragged: &str,
    target: &str,
    zone: DropZone,
) -> Option<SidebarCommand> {
    if dragged == target {
        return None;
    }

    let dragged_section = notebook.section(dragged);
    let dragged_item = match (dragged_section, notebook.group(dragged)) {
        (Some(_), _) => SidebarItem::section(dragged),
        (None, Some(_)) => SidebarItem::group(dragged),
        (None, None) => return None,
    };
    let target_is_group = notebook.group(target).is_some();
    let target_section = notebook.section(target);
    if !target_is_group && target_section.is_none() {
        return None;
    }

    // Joining a group: drop inside a group, or anywhere on a grouped section.
    let joined_group = if target_is_group && zone == DropZone::Inside {
        Some(target)
    } else {
        target_section.and_then(|s| s.group_id.as_deref())
    };
    if let Some(group_id) = joined_group {
        let section = dragged_section?;
        if section.group_id.as_deref() == Some(group_id) {
            return None;
        }
        return Some(SidebarCommand::MoveSectionToGroup {
            section_id: dragged.to_string(),
            group_id: Some(group_id.to_string()),
            target_index: None,
        });
    }

    let mut order: Vec<SidebarItem> = notebook
        .sidebar_order
        .iter()
        .filter(|item| item.id != dragged)
        .cloned()
        .collect();
    let index = match order.iter().position(|item| item.id == target) {
        Some(pos) if zone == DropZone::Before => pos,
        Some(pos) => pos + 1,
        None => order.len(),
    };

    match dragged_section {
        Some(section) if !section.is_top_level() => Some(SidebarCommand::MoveSectionToGroup {
            section_id: dragged.to_string(),
            group_id: None,
            target_index: Some(index),
        }),
        _ => {
            order.insert(index, dragged_item);
            Some(SidebarCommand::Reorder(order))
        }
    }
}

/// Applies a resolved drop to the notebook it was resolved against.
pub fn apply(snapshot: Snapshot, notebook_id: &str, command: SidebarCommand) -> Snapshot {
    match command {
        SidebarCommand::Reorder(order) => reorder_items(snapshot, notebook_id, order),
        SidebarCommand::MoveSectionToGroup {
            section_id,
            group_id,
            target_index,
        } => move_section_to_group(snapshot, &section_id, group_id.as_deref(), target_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture, section, sidebar_ids};
    use std::collections::HashSet;

    fn notebook(snapshot: &Snapshot) -> &Notebook {
        &snapshot.notebooks[0]
    }

    fn assert_permutation(before: &[String], after: &[String]) {
        let unique: HashSet<_> = after.iter().collect();
        assert_eq!(unique.len(), after.len(), "duplicate entry in {after:?}");
        let mut a = before.to_vec();
        let mut b = after.to_vec();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    fn drop_and_apply(snapshot: Snapshot, dragged: &str, target: &str, zone: DropZone) -> Snapshot {
        let command = resolve_drop(notebook(&snapshot), dragged, target, zone);
        match command {
            Some(command) => apply(snapshot, "nb", command),
            None => snapshot,
        }
    }

    #[test]
    fn reorder_items_replaces_order() {
        let fx = fixture();
        let order = vec![
            SidebarItem::group("grp"),
            SidebarItem::section("sec-b"),
            SidebarItem::section("sec-a"),
        ];
        let next = reorder_items(fx.snapshot, &fx.notebook_id, order);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["grp", "sec-b", "sec-a"]);
    }

    #[test]
    fn reorder_items_unknown_notebook_is_noop() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        assert_eq!(reorder_items(fx.snapshot, "nope", Vec::new()), before);
    }

    #[test]
    fn move_into_group_removes_sidebar_entry() {
        let fx = fixture();
        let next = move_section_to_group(fx.snapshot, &fx.section_a, Some(&fx.group_id), None);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-b", "grp"]);
        let members: Vec<_> = notebook(&next)
            .group_members("grp")
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(members, vec!["sec-a", "sec-c"]);
    }

    #[test]
    fn move_into_unknown_group_is_noop() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        let next = move_section_to_group(fx.snapshot, &fx.section_a, Some("nope"), None);
        assert_eq!(next, before);
    }

    #[test]
    fn leave_group_at_index() {
        let fx = fixture();
        let next = move_section_to_group(fx.snapshot, &fx.section_c, None, Some(1));
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-a", "sec-c", "sec-b", "grp"]);
        assert!(next.find_section("sec-c").unwrap().1.is_top_level());
    }

    #[test]
    fn leave_group_without_index_appends() {
        let fx = fixture();
        let next = move_section_to_group(fx.snapshot, &fx.section_c, None, None);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-a", "sec-b", "grp", "sec-c"]);
    }

    #[test]
    fn leave_group_index_is_clamped() {
        let fx = fixture();
        let next = move_section_to_group(fx.snapshot, &fx.section_c, None, Some(99));
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-a", "sec-b", "grp", "sec-c"]);
    }

    #[test]
    fn top_level_section_is_repositioned_not_duplicated() {
        let fx = fixture();
        let next = move_section_to_group(fx.snapshot, &fx.section_b, None, Some(0));
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-b", "sec-a", "grp"]);

        let next = move_section_to_group(next, &fx.section_b, None, None);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-b", "sec-a", "grp"]);
    }

    #[test]
    fn regrouping_into_another_group_then_leaving_appends() {
        let fx = fixture();
        let (snapshot, other) = crate::commands::groups::add(fx.snapshot, "nb", None);
        let other = other.unwrap();
        let next = move_section_to_group(snapshot, &fx.section_c, Some(&other), None);
        let next = move_section_to_group(next, &fx.section_c, None, None);
        assert_eq!(sidebar_ids(&next, "nb").last().map(String::as_str), Some("sec-c"));
    }

    #[test]
    fn drop_before_and_after_top_level_items() {
        let fx = fixture();
        let before = sidebar_ids(&fx.snapshot, "nb");

        let next = drop_and_apply(fx.snapshot, "sec-a", "grp", DropZone::After);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-b", "grp", "sec-a"]);
        assert_permutation(&before, &sidebar_ids(&next, "nb"));

        let next = drop_and_apply(next, "grp", "sec-b", DropZone::Before);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["grp", "sec-b", "sec-a"]);
        assert_permutation(&before, &sidebar_ids(&next, "nb"));
    }

    #[test]
    fn drop_inside_group_enqueues_move() {
        let fx = fixture();
        let command = resolve_drop(notebook(&fx.snapshot), "sec-b", "grp", DropZone::Inside);
        assert_eq!(
            command,
            Some(SidebarCommand::MoveSectionToGroup {
                section_id: "sec-b".into(),
                group_id: Some("grp".into()),
                target_index: None,
            })
        );
    }

    #[test]
    fn drop_on_grouped_section_joins_its_group() {
        let fx = fixture();
        let next = drop_and_apply(fx.snapshot, "sec-a", "sec-c", DropZone::Before);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-b", "grp"]);
        assert_eq!(
            next.find_section("sec-a").unwrap().1.group_id.as_deref(),
            Some("grp")
        );
    }

    #[test]
    fn grouped_section_dropped_on_top_level_item_leaves_group() {
        let fx = fixture();
        let next = drop_and_apply(fx.snapshot, "sec-c", "sec-a", DropZone::After);
        assert_eq!(sidebar_ids(&next, "nb"), vec!["sec-a", "sec-c", "sec-b", "grp"]);
        assert!(next.find_section("sec-c").unwrap().1.is_top_level());
    }

    #[test]
    fn no_op_drops() {
        let fx = fixture();
        let nb = notebook(&fx.snapshot);
        assert_eq!(resolve_drop(nb, "sec-a", "sec-a", DropZone::Before), None);
        assert_eq!(resolve_drop(nb, "nope", "sec-a", DropZone::Before), None);
        assert_eq!(resolve_drop(nb, "sec-a", "nope", DropZone::Before), None);
        assert_eq!(resolve_drop(nb, "grp", "sec-c", DropZone::Inside), None);
        assert_eq!(resolve_drop(nb, "sec-c", "grp", DropZone::Inside), None);
    }

    #[test]
    fn sequences_of_drops_preserve_entries() {
        let mut fx = fixture();
        fx.snapshot.notebooks[0]
            .sections
            .push(section("sec-x", "X", Vec::new()));
        fx.snapshot.notebooks[0]
            .sidebar_order
            .push(SidebarItem::section("sec-x"));
        let before = sidebar_ids(&fx.snapshot, "nb");

        let moves = [
            ("sec-x", "sec-a", DropZone::Before),
            ("grp", "sec-x", DropZone::After),
            ("sec-a", "sec-b", DropZone::Before),
            ("sec-b", "sec-x", DropZone::After),
            ("sec-x", "grp", DropZone::After),
        ];
        let mut snapshot = fx.snapshot;
        for (dragged, target, zone) in moves {
            snapshot = drop_and_apply(snapshot, dragged, target, zone);
            assert_permutation(&before, &sidebar_ids(&snapshot, "nb"));
        }
    }
}
