//! Section groups: folder-like, collapsible, ordered among top-level items.
//!
//! A group owns no ordering of its own. Membership is the `group_id` on each
//! section and members render in `sections` order. What a group *does* own is
//! its slot in `sidebar_order`, and [`remove`] hands that slot to the released
//! sections.

use super::helpers::{group_location, notebook_index};
use crate::model::{SectionGroup, SidebarItem, SidebarItemKind, Snapshot, DEFAULT_GROUP_TITLE};

/// Creates a group at the end of the sidebar, optionally enclosing one section
/// in the same step.
pub fn add(
    mut snapshot: Snapshot,
    notebook_id: &str,
    enclose_section: Option<&str>,
) -> (Snapshot, Option<String>) {
    let Some(ni) = notebook_index(&snapshot, notebook_id) else {
        return (snapshot, None);
    };

    let group = SectionGroup::new(DEFAULT_GROUP_TITLE);
    let id = group.id.clone();
    let notebook = &mut snapshot.notebooks[ni];

    if let Some(section_id) = enclose_section {
        if let Some(section) = notebook.sections.iter_mut().find(|s| s.id == section_id) {
            section.group_id = Some(id.clone());
            notebook.sidebar_order.retain(|item| item.id != section_id);
        }
    }

    notebook.section_groups.push(group);
    notebook.sidebar_order.push(SidebarItem::group(id.clone()));
    (snapshot, Some(id))
}

/// Renames a group. Blank titles are ignored.
pub fn rename(mut snapshot: Snapshot, group_id: &str, title: &str) -> Snapshot {
    let title = title.trim();
    if title.is_empty() {
        return snapshot;
    }
    if let Some((ni, gi)) = group_location(&snapshot, group_id) {
        snapshot.notebooks[ni].section_groups[gi].title = title.to_string();
    }
    snapshot
}

pub fn toggle_collapsed(mut snapshot: Snapshot, group_id: &str) -> Snapshot {
    if let Some((ni, gi)) = group_location(&snapshot, group_id) {
        let group = &mut snapshot.notebooks[ni].section_groups[gi];
        group.is_collapsed = !group.is_collapsed;
    }
    snapshot
}

/// Dissolves a group. Its member sections become top-level and take over the
/// group's sidebar slot, in `sections` order.
pub fn remove(mut snapshot: Snapshot, group_id: &str) -> Snapshot {
    let Some((ni, gi)) = group_location(&snapshot, group_id) else {
        return snapshot;
    };

    let notebook = &mut snapshot.notebooks[ni];
    let members: Vec<String> = notebook
        .group_members(group_id)
        .map(|s| s.id.clone())
        .collect();

    for section in notebook.sections.iter_mut() {
        if section.group_id.as_deref() == Some(group_id) {
            section.group_id = None;
        }
    }
    notebook.section_groups.remove(gi);

    // Members must not appear twice, even if a stale entry was left behind.
    notebook
        .sidebar_order
        .retain(|item| !members.contains(&item.id));

    let released = members.into_iter().map(SidebarItem::section);
    let slot = notebook
        .sidebar_order
        .iter()
        .position(|item| item.id == group_id && item.kind == SidebarItemKind::Group);
    match slot {
        Some(pos) => {
            notebook.sidebar_order.splice(pos..=pos, released);
        }
        None => notebook.sidebar_order.extend(released),
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::section_location;
    use crate::test_utils::{fixture, sidebar_ids};

    fn enclosed(snapshot: &Snapshot, section_id: &str) -> Option<String> {
        section_location(snapshot, section_id)
            .and_then(|(ni, si)| snapshot.notebooks[ni].sections[si].group_id.clone())
    }

    #[test]
    fn add_appends_group_entry() {
        let fx = fixture();
        let (next, id) = add(fx.snapshot, &fx.notebook_id, None);
        let id = id.unwrap();
        let nb = next.notebook(&fx.notebook_id).unwrap();
        assert_eq!(nb.sidebar_order.last().unwrap(), &SidebarItem::group(&id));
        let group = nb.group(&id).unwrap();
        assert_eq!(group.title, DEFAULT_GROUP_TITLE);
        assert!(!group.is_collapsed);
    }

    #[test]
    fn add_encloses_section_in_one_step() {
        let fx = fixture();
        let (next, id) = add(fx.snapshot, &fx.notebook_id, Some(&fx.section_b));
        let id = id.unwrap();

        assert_eq!(enclosed(&next, &fx.section_b), Some(id.clone()));
        assert_eq!(
            sidebar_ids(&next, &fx.notebook_id),
            vec!["sec-a".to_string(), "grp".to_string(), id]
        );
    }

    #[test]
    fn rename_and_toggle() {
        let fx = fixture();
        let next = rename(fx.snapshot, &fx.group_id, "Archive");
        let next = toggle_collapsed(next, &fx.group_id);
        let (_, group) = next.find_group(&fx.group_id).unwrap();
        assert_eq!(group.title, "Archive");
        assert!(group.is_collapsed);

        let next = toggle_collapsed(next, &fx.group_id);
        assert!(!next.find_group(&fx.group_id).unwrap().1.is_collapsed);
    }

    #[test]
    fn remove_releases_members_into_group_slot() {
        let fx = fixture();
        // Enclose sec-a into the group as well: order becomes [sec-b, grp].
        let mut snapshot = fx.snapshot;
        {
            let nb = &mut snapshot.notebooks[0];
            nb.sections[0].group_id = Some(fx.group_id.clone());
            nb.sidebar_order.retain(|i| i.id != "sec-a");
        }
        // Add two more top-level sections ahead of the group: [x, y, grp, sec-b].
        {
            let nb = &mut snapshot.notebooks[0];
            nb.sections
                .push(crate::test_utils::section("x", "X", Vec::new()));
            nb.sections
                .push(crate::test_utils::section("y", "Y", Vec::new()));
            nb.sidebar_order = vec![
                SidebarItem::section("x"),
                SidebarItem::section("y"),
                SidebarItem::group("grp"),
                SidebarItem::section("sec-b"),
            ];
        }

        let next = remove(snapshot, &fx.group_id);

        // Members in sections order: sec-a, sec-c. They occupy indices 2 and 3.
        assert_eq!(
            sidebar_ids(&next, &fx.notebook_id),
            vec!["x", "y", "sec-a", "sec-c", "sec-b"]
        );
        let nb = next.notebook(&fx.notebook_id).unwrap();
        assert!(nb.section_groups.is_empty());
        assert!(nb.sections.iter().all(|s| s.group_id.is_none()));
    }

    #[test]
    fn remove_empty_group_just_drops_entry() {
        let fx = fixture();
        let (snapshot, id) = add(fx.snapshot, &fx.notebook_id, None);
        let next = remove(snapshot, &id.unwrap());
        assert_eq!(
            sidebar_ids(&next, &fx.notebook_id),
            vec!["sec-a", "sec-b", "grp"]
        );
    }

    #[test]
    fn remove_unknown_group_is_noop() {
        let fx = fixture();
        let before = fx.snapshot.clone();
        assert_eq!(remove(fx.snapshot, "nope"), before);
    }
}
