//! # Domain Model: Notebooks, Sections, Pages and Copy Blocks
//!
//! This module defines the entity types of binder. They are pure data: every
//! behavior lives in the command layer, which takes a [`Snapshot`] by value and
//! returns the next one.
//!
//! ## The Hierarchy
//!
//! ```text
//! Notebook
//! ├── sidebar_order   [SidebarItem]   <-- authoritative top-level order
//! ├── section_groups  [SectionGroup]  <-- folders, no ordering list of their own
//! └── sections        [Section]       <-- group members are rendered in this order
//!     └── pages       [Page]
//!         └── copy_areas [CopyBlock]
//! ```
//!
//! ## Sidebar Invariant
//!
//! `sidebar_order` holds exactly one entry per top-level item:
//! - every [`SectionGroup`], always;
//! - every [`Section`] whose `group_id` is `None`.
//!
//! A grouped section never appears in `sidebar_order`.
//!
//! ## Page Blocks
//!
//! A page with `is_subpage = true` hangs off the nearest preceding page that is
//! not a subpage. A lead page plus its contiguous run of subpages forms a
//! *block*, which moves as a unit. Blocks are never stored; see
//! [`crate::commands::reorder::page_block`].
//!
//! ## Wire Format
//!
//! All types serialize with camelCase field names. [`Snapshot`] is exactly the
//! persisted blob:
//!
//! ```text
//! { "notebooks": [...], "activeNotebookId": ..., "activeSectionId": ..., "activePageId": ... }
//! ```
//!
//! Ids are strings. Older blobs carry hand-made ids (`nb1`, `page_1700000000000`),
//! new entities get UUID v4 strings from [`new_id`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Accent colors handed out to new sections, cycled by section count.
pub const SECTION_COLORS: [&str; 6] = [
    "#ef4444", // Red
    "#f59e0b", // Amber
    "#10b981", // Emerald
    "#3b82f6", // Blue
    "#8b5cf6", // Violet
    "#ec4899", // Pink
];

pub const DEFAULT_SECTION_TITLE: &str = "New Section";
pub const DEFAULT_GROUP_TITLE: &str = "Section Group";
pub const UNTITLED_PAGE: &str = "Untitled Page";
pub const COPY_BLOCK_LABEL: &str = "Copy Block";

/// Generates a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds, the unit of `last_modified`.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBlock {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CopyBlock {
    pub fn new() -> Self {
        Self {
            id: new_id(),
            title: String::new(),
            content: String::new(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            COPY_BLOCK_LABEL
        } else {
            &self.title
        }
    }
}

impl Default for CopyBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Opaque rich-text (HTML) body.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub copy_areas: Vec<CopyBlock>,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub is_subpage: bool,
}

impl Page {
    /// A blank page: empty title and body, one empty copy block.
    pub fn new() -> Self {
        Self {
            id: new_id(),
            title: String::new(),
            content: String::new(),
            copy_areas: vec![CopyBlock::new()],
            last_modified: now_millis(),
            is_subpage: false,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_PAGE
        } else {
            &self.title
        }
    }

    pub fn copy_block(&self, id: &str) -> Option<&CopyBlock> {
        self.copy_areas.iter().find(|b| b.id == id)
    }

    pub(crate) fn touch(&mut self) {
        self.last_modified = now_millis();
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Section {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            color: color.into(),
            group_id: None,
            pages: Vec::new(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.group_id.is_none()
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_collapsed: bool,
}

impl SectionGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            is_collapsed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarItemKind {
    Section,
    Group,
}

/// A reference to a top-level sidebar entry. The entity itself lives in
/// `sections` or `section_groups`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SidebarItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SidebarItemKind,
}

impl SidebarItem {
    pub fn section(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SidebarItemKind::Section,
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SidebarItemKind::Group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sidebar_order: Vec<SidebarItem>,
    #[serde(default)]
    pub section_groups: Vec<SectionGroup>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Notebook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            sidebar_order: Vec::new(),
            section_groups: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&SectionGroup> {
        self.section_groups.iter().find(|g| g.id == id)
    }

    /// Member sections of a group, in `sections` order.
    pub fn group_members<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections
            .iter()
            .filter(move |s| s.group_id.as_deref() == Some(group_id))
    }

    pub fn sidebar_position(&self, id: &str) -> Option<usize> {
        self.sidebar_order.iter().position(|item| item.id == id)
    }

    /// The first top-level section in sidebar order, used when a notebook
    /// becomes active.
    pub fn first_top_level_section(&self) -> Option<&Section> {
        self.sidebar_order
            .iter()
            .filter(|item| item.kind == SidebarItemKind::Section)
            .find_map(|item| self.section(&item.id))
    }
}

/// Which side of the drop target a dragged item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
}

/// The structural, persisted state: the notebook forest plus the active
/// selection pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub notebooks: Vec<Notebook>,
    pub active_notebook_id: Option<String>,
    pub active_section_id: Option<String>,
    pub active_page_id: Option<String>,
}

impl Snapshot {
    pub fn notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|nb| nb.id == id)
    }

    /// The active notebook, or the first one when the pointer is unset.
    pub fn active_notebook(&self) -> Option<&Notebook> {
        self.active_notebook_id
            .as_deref()
            .and_then(|id| self.notebook(id))
            .or_else(|| self.notebooks.first())
    }

    pub fn active_section(&self) -> Option<&Section> {
        let id = self.active_section_id.as_deref()?;
        self.find_section(id).map(|(_, sec)| sec)
    }

    pub fn active_page(&self) -> Option<&Page> {
        let id = self.active_page_id.as_deref()?;
        self.find_page(id).map(|(_, page)| page)
    }

    pub fn find_section(&self, id: &str) -> Option<(&Notebook, &Section)> {
        self.notebooks
            .iter()
            .find_map(|nb| nb.section(id).map(|sec| (nb, sec)))
    }

    pub fn find_page(&self, id: &str) -> Option<(&Section, &Page)> {
        self.notebooks
            .iter()
            .flat_map(|nb| nb.sections.iter())
            .find_map(|sec| sec.page(id).map(|page| (sec, page)))
    }

    pub fn find_group(&self, id: &str) -> Option<(&Notebook, &SectionGroup)> {
        self.notebooks
            .iter()
            .find_map(|nb| nb.group(id).map(|g| (nb, g)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    Title,
    Content,
    CopyArea,
}

/// A located occurrence of a search term. Recomputed on every search, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub id: String,
    pub notebook_id: String,
    pub section_id: String,
    pub page_id: String,
    pub field_name: MatchField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_area_index: Option<usize>,
    /// Offset in chars within the searched text.
    pub start: usize,
    pub preview: String,
}

impl SearchMatch {
    /// Display label of the matched field: `title`, `body` or `copy-block-N`
    /// (N counts from 1).
    pub fn label(&self) -> String {
        match self.field_name {
            MatchField::Title => "title".to_string(),
            MatchField::Content => "body".to_string(),
            MatchField::CopyArea => {
                format!("copy-block-{}", self.copy_area_index.unwrap_or(0) + 1)
            }
        }
    }
}

impl fmt::Display for SearchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.label(), self.preview)
    }
}

/// Everything the store holds: the persisted snapshot plus transient UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub snapshot: Snapshot,
    pub is_dirty: bool,
    pub toast_message: Option<String>,
    pub search_term: String,
    pub search_results: Vec<SearchMatch>,
    pub current_search_result_index: Option<usize>,
}

impl AppState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.current_search_result_index
            .and_then(|i| self.search_results.get(i))
    }
}
