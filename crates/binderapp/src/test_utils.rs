use crate::model::{CopyBlock, Notebook, Page, Section, SectionGroup, SidebarItem, Snapshot};

/// A small, hand-built notebook used across command tests.
///
/// ```text
/// nb
/// ├── sec-a          pages: pg-a, pg-b (sub), pg-c (sub), pg-d
/// ├── sec-b          pages: pg-e (copy blocks cb-1, cb-2, cb-3)
/// └── grp (group)
///     └── sec-c      pages: none
/// ```
pub struct Fixture {
    pub snapshot: Snapshot,
    pub notebook_id: String,
    pub section_a: String,
    pub section_b: String,
    pub section_c: String,
    pub group_id: String,
    /// Page ids of `sec-a`, in order.
    pub pages: Vec<String>,
    pub page_e: String,
    pub copy_blocks: Vec<String>,
}

pub fn page(id: &str, title: &str, content: &str, is_subpage: bool) -> Page {
    Page {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        copy_areas: vec![copy_block(&format!("{id}-copy"), "")],
        last_modified: 0,
        is_subpage,
    }
}

pub fn copy_block(id: &str, content: &str) -> CopyBlock {
    CopyBlock {
        id: id.to_string(),
        title: String::new(),
        content: content.to_string(),
    }
}

pub fn section(id: &str, title: &str, pages: Vec<Page>) -> Section {
    Section {
        id: id.to_string(),
        title: title.to_string(),
        color: "#3b82f6".to_string(),
        group_id: None,
        pages,
    }
}

pub fn fixture() -> Fixture {
    let sec_a = section(
        "sec-a",
        "Alpha",
        vec![
            page("pg-a", "Lead", "<p>lead body</p>", false),
            page("pg-b", "Sub one", "", true),
            page("pg-c", "Sub two", "", true),
            page("pg-d", "Dangling", "", false),
        ],
    );

    let mut pg_e = page("pg-e", "Blocks", "", false);
    pg_e.copy_areas = vec![
        copy_block("cb-1", "first"),
        copy_block("cb-2", "second"),
        copy_block("cb-3", "third"),
    ];
    let sec_b = section("sec-b", "Beta", vec![pg_e]);

    let mut sec_c = section("sec-c", "Gamma", Vec::new());
    sec_c.group_id = Some("grp".to_string());

    let notebook = Notebook {
        id: "nb".to_string(),
        title: "Notebook".to_string(),
        sidebar_order: vec![
            SidebarItem::section("sec-a"),
            SidebarItem::section("sec-b"),
            SidebarItem::group("grp"),
        ],
        section_groups: vec![SectionGroup {
            id: "grp".to_string(),
            title: "Group".to_string(),
            is_collapsed: false,
        }],
        sections: vec![sec_a, sec_b, sec_c],
    };

    Fixture {
        snapshot: Snapshot {
            notebooks: vec![notebook],
            active_notebook_id: Some("nb".to_string()),
            active_section_id: Some("sec-a".to_string()),
            active_page_id: Some("pg-a".to_string()),
        },
        notebook_id: "nb".to_string(),
        section_a: "sec-a".to_string(),
        section_b: "sec-b".to_string(),
        section_c: "sec-c".to_string(),
        group_id: "grp".to_string(),
        pages: ["pg-a", "pg-b", "pg-c", "pg-d"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        page_e: "pg-e".to_string(),
        copy_blocks: ["cb-1", "cb-2", "cb-3"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Ids of a notebook's sidebar entries, in order.
pub fn sidebar_ids(snapshot: &Snapshot, notebook_id: &str) -> Vec<String> {
    snapshot
        .notebook(notebook_id)
        .map(|nb| nb.sidebar_order.iter().map(|i| i.id.clone()).collect())
        .unwrap_or_default()
}

/// Ids of a section's pages, in order.
pub fn page_ids(snapshot: &Snapshot, section_id: &str) -> Vec<String> {
    snapshot
        .find_section(section_id)
        .map(|(_, sec)| sec.pages.iter().map(|p| p.id.clone()).collect())
        .unwrap_or_default()
}
