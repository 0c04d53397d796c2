//! # Schema Migration
//!
//! Stored blobs come in several historical shapes. Migration rewrites any of
//! them into the current one on the untyped JSON value, before typed
//! deserialization:
//!
//! 1. `specialContent: string` on a page with no `copyAreas` becomes a single
//!    copy block holding that text.
//! 2. `copyAreas: string[]` becomes id-keyed blocks `{pageId}-copy-{i}`.
//! 3. A page without copy blocks gets one empty block `{pageId}-copy-0`.
//! 4. Missing page fields get their defaults.
//! 5. A notebook without `sectionGroups` gets an empty list.
//! 6. A notebook without `sidebarOrder` adopts the blob-level `sidebarOrder`
//!    (active notebook, else the first) or starts empty.
//! 7. The sidebar is repaired against the sections and groups that exist.
//!
//! Migration is deterministic (no fresh ids are minted) and idempotent: a
//! migrated blob migrates to itself.

use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Migrates `blob` in place. Returns `true` when anything changed.
pub fn migrate(blob: &mut Value) -> bool {
    let Some(root) = blob.as_object_mut() else {
        return false;
    };

    let legacy_order = root.remove("sidebarOrder");
    let mut changed = legacy_order.is_some();

    let active_id = root
        .get("activeNotebookId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let Some(notebooks) = root.get_mut("notebooks").and_then(Value::as_array_mut) else {
        return changed;
    };

    let adopter = legacy_order.as_ref().and_then(|_| {
        active_id
            .as_deref()
            .and_then(|id| notebooks.iter().position(|nb| id_of(nb) == Some(id)))
            .or(if notebooks.is_empty() { None } else { Some(0) })
    });

    for (i, notebook) in notebooks.iter_mut().enumerate() {
        let Some(notebook) = notebook.as_object_mut() else {
            continue;
        };
        let inherited = if adopter == Some(i) {
            legacy_order.clone()
        } else {
            None
        };
        changed |= migrate_notebook(notebook, inherited);
    }
    changed
}

fn id_of(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn ids_of(list: Option<&Value>) -> Vec<String> {
    list.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(id_of).map(str::to_string).collect())
        .unwrap_or_default()
}

fn migrate_notebook(notebook: &mut Map<String, Value>, legacy_order: Option<Value>) -> bool {
    let mut changed = false;

    if let Some(sections) = notebook.get_mut("sections").and_then(Value::as_array_mut) {
        let pages = sections
            .iter_mut()
            .filter_map(|s| s.get_mut("pages").and_then(Value::as_array_mut))
            .flat_map(|pages| pages.iter_mut())
            .filter_map(Value::as_object_mut);
        for page in pages {
            changed |= migrate_page(page);
        }
    }

    if !notebook.get("sectionGroups").is_some_and(Value::is_array) {
        notebook.insert("sectionGroups".into(), json!([]));
        changed = true;
    }
    if !notebook.get("sidebarOrder").is_some_and(Value::is_array) {
        let order = legacy_order.filter(Value::is_array).unwrap_or_else(|| json!([]));
        notebook.insert("sidebarOrder".into(), order);
        changed = true;
    }

    repair_sidebar(notebook) || changed
}

fn migrate_page(page: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    let page_id = id_of_map(page);

    if let Some(special) = page.remove("specialContent") {
        changed = true;
        if !page.get("copyAreas").is_some_and(Value::is_array) {
            let text = special.as_str().unwrap_or_default().to_string();
            page.insert("copyAreas".into(), json!([text]));
        }
    }

    let areas = match page.remove("copyAreas") {
        Some(Value::Array(areas)) => areas,
        _ => {
            changed = true;
            Vec::new()
        }
    };
    let mut blocks = Vec::with_capacity(areas.len().max(1));
    for (i, area) in areas.into_iter().enumerate() {
        match area {
            Value::String(content) => {
                changed = true;
                blocks.push(legacy_block(&page_id, i, content));
            }
            Value::Object(mut block) => {
                if id_of_map(&block).is_empty() {
                    block.insert("id".into(), json!(format!("{page_id}-copy-{i}")));
                    changed = true;
                }
                blocks.push(Value::Object(block));
            }
            _ => changed = true,
        }
    }
    if blocks.is_empty() {
        blocks.push(legacy_block(&page_id, 0, String::new()));
        changed = true;
    }
    page.insert("copyAreas".into(), Value::Array(blocks));

    for (key, default) in [
        ("title", json!("")),
        ("content", json!("")),
        ("isSubpage", json!(false)),
        ("lastModified", json!(0)),
    ] {
        if matches!(page.get(key), None | Some(Value::Null)) {
            page.insert(key.into(), default);
            changed = true;
        }
    }
    changed
}

fn id_of_map(map: &Map<String, Value>) -> String {
    map.get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn legacy_block(page_id: &str, index: usize, content: String) -> Value {
    json!({
        "id": format!("{page_id}-copy-{index}"),
        "title": "",
        "content": content,
    })
}

/// Rebuilds `sidebarOrder` so it lists every group and every top-level
/// section exactly once, keeping the existing relative order.
fn repair_sidebar(notebook: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    let group_ids = ids_of(notebook.get("sectionGroups"));

    let mut top_level = Vec::new();
    if let Some(sections) = notebook.get_mut("sections").and_then(Value::as_array_mut) {
        for section in sections.iter_mut().filter_map(Value::as_object_mut) {
            let id = id_of_map(section);
            let group = section.get("groupId").and_then(Value::as_str);
            if group.is_some_and(|g| group_ids.iter().any(|known| known == g)) {
                continue;
            }
            // Orphaned or null group reference: the section is top-level.
            if section.remove("groupId").is_some() {
                changed = true;
            }
            top_level.push(id);
        }
    }

    let current = notebook
        .get("sidebarOrder")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(current.len());
    for entry in &current {
        let (Some(id), Some(kind)) = (id_of(entry), entry.get("type").and_then(Value::as_str))
        else {
            continue;
        };
        let known = match kind {
            "section" => top_level.iter().any(|s| s == id),
            "group" => group_ids.iter().any(|g| g == id),
            _ => false,
        };
        if known && seen.insert(id.to_string()) {
            order.push(json!({ "id": id, "type": kind }));
        }
    }
    for (ids, kind) in [(&group_ids, "group"), (&top_level, "section")] {
        for id in ids {
            if seen.insert(id.clone()) {
                order.push(json!({ "id": id, "type": kind }));
            }
        }
    }

    let order = Value::Array(order);
    if notebook.get("sidebarOrder") != Some(&order) {
        notebook.insert("sidebarOrder".into(), order);
        changed = true;
    }
    changed
}
