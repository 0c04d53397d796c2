//! # Store Facade
//!
//! [`NotebookStore`] is the single entry point for every binder operation,
//! whatever UI drives it. It owns one [`AppState`] and changes it only through
//! [`NotebookStore::apply`], one [`Action`] at a time. `apply` takes
//! `&mut self`, so two actions can never interleave.
//!
//! ## Role and Responsibilities
//!
//! The store:
//! - **Dispatches** each action to its command function
//! - **Checks targets**: an action naming an unknown id is reported as a
//!   warning and changes nothing
//! - **Persists**: write-through, on the same call, whenever the structural
//!   snapshot changed
//! - **Keeps transient state**: toast, search term, results and cursor
//!
//! ## What the Store Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: it returns [`ActionOutcome`]s, not strings for a terminal
//! - **Roll back**: a failed write leaves the new state in memory and
//!   `is_dirty` set
//!
//! ## Generic Over BlobStore
//!
//! `NotebookStore<B: BlobStore>` runs on any transport:
//! - Production: `NotebookStore<FsBackend>`
//! - Testing: `NotebookStore<MemBackend>`

use crate::commands::search::{self, SearchOptions, SearchOutcome};
use crate::commands::sidebar::{self, DropZone};
use crate::commands::{
    copy_blocks, groups, pages, reorder, sections, selection, CmdMessage, CopyBlockUpdate,
    PageUpdate,
};
use crate::model::{AppState, DropPosition, SearchMatch, SidebarItem, Snapshot};
use crate::persist::Persistence;
use crate::store::BlobStore;
use tracing::{debug, warn};

/// Toast shown when a search finds nothing.
pub const NO_MATCHES_TOAST: &str = "No matches found";

/// Everything a UI can ask the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddSection {
        notebook_id: String,
    },
    RenameSection {
        section_id: String,
        title: String,
    },
    DeleteSection {
        section_id: String,
    },
    AddPage {
        section_id: String,
    },
    UpdatePage {
        page_id: String,
        update: PageUpdate,
    },
    DeletePage {
        page_id: String,
    },
    ToggleSubpage {
        page_id: String,
    },
    AddCopyBlock {
        page_id: String,
    },
    UpdateCopyBlock {
        page_id: String,
        block_id: String,
        update: CopyBlockUpdate,
    },
    DeleteCopyBlock {
        page_id: String,
        block_id: String,
    },
    AddSectionGroup {
        notebook_id: String,
        enclose_section: Option<String>,
    },
    RenameSectionGroup {
        group_id: String,
        title: String,
    },
    RemoveSectionGroup {
        group_id: String,
    },
    ToggleSectionGroupCollapsed {
        group_id: String,
    },
    ReorderSidebarItems {
        notebook_id: String,
        order: Vec<SidebarItem>,
    },
    MoveSectionToGroup {
        section_id: String,
        group_id: Option<String>,
        target_index: Option<usize>,
    },
    /// A sidebar drag-and-drop, resolved by the store.
    DropOnSidebar {
        notebook_id: String,
        dragged_id: String,
        target_id: String,
        zone: DropZone,
    },
    ReorderPages {
        section_id: String,
        dragged_id: String,
        target_id: String,
        position: DropPosition,
    },
    ReorderCopyAreas {
        page_id: String,
        dragged_id: String,
        target_id: String,
        position: DropPosition,
    },
    SetActiveNotebook {
        notebook_id: String,
    },
    SetActiveSection {
        section_id: String,
    },
    SetActivePage {
        page_id: String,
    },
    PerformSearch {
        term: String,
    },
    GoToNextResult,
    JumpToResult(SearchMatch),
    JumpToIndex(usize),
    ClearSearch,
    ShowToast(String),
    DismissToast,
    MarkSaved,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddSection { .. } => "addSection",
            Action::RenameSection { .. } => "renameSection",
            Action::DeleteSection { .. } => "deleteSection",
            Action::AddPage { .. } => "addPage",
            Action::UpdatePage { .. } => "updatePage",
            Action::DeletePage { .. } => "deletePage",
            Action::ToggleSubpage { .. } => "toggleSubpage",
            Action::AddCopyBlock { .. } => "addCopyBlock",
            Action::UpdateCopyBlock { .. } => "updateCopyBlock",
            Action::DeleteCopyBlock { .. } => "deleteCopyBlock",
            Action::AddSectionGroup { .. } => "addSectionGroup",
            Action::RenameSectionGroup { .. } => "renameSectionGroup",
            Action::RemoveSectionGroup { .. } => "removeSectionGroup",
            Action::ToggleSectionGroupCollapsed { .. } => "toggleSectionGroupCollapsed",
            Action::ReorderSidebarItems { .. } => "reorderSidebarItems",
            Action::MoveSectionToGroup { .. } => "moveSectionToGroup",
            Action::DropOnSidebar { .. } => "dropOnSidebar",
            Action::ReorderPages { .. } => "reorderPages",
            Action::ReorderCopyAreas { .. } => "reorderCopyAreas",
            Action::SetActiveNotebook { .. } => "setActiveNotebook",
            Action::SetActiveSection { .. } => "setActiveSection",
            Action::SetActivePage { .. } => "setActivePage",
            Action::PerformSearch { .. } => "performSearch",
            Action::GoToNextResult => "goToNextResult",
            Action::JumpToResult(_) => "jumpToResult",
            Action::JumpToIndex(_) => "jumpToIndex",
            Action::ClearSearch => "clearSearch",
            Action::ShowToast(_) => "showToast",
            Action::DismissToast => "dismissToast",
            Action::MarkSaved => "markSaved",
        }
    }
}

/// What happened to the write-through after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Saved,
    /// Nothing structural changed, so nothing was written.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Id of the entity an `Add*` action created.
    pub created_id: Option<String>,
    pub messages: Vec<CmdMessage>,
    pub persisted: Persisted,
}

impl ActionOutcome {
    fn skipped(messages: Vec<CmdMessage>) -> Self {
        Self {
            created_id: None,
            messages,
            persisted: Persisted::Skipped,
        }
    }
}

pub struct NotebookStore<B: BlobStore> {
    persistence: Persistence<B>,
    state: AppState,
    search: SearchOptions,
}

impl<B: BlobStore> NotebookStore<B> {
    /// Loads the stored snapshot (or the seed) and wraps it in a store.
    pub fn new(persistence: Persistence<B>, search: SearchOptions) -> Self {
        let snapshot = persistence.load();
        Self {
            persistence,
            state: AppState::new(snapshot),
            search,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state.snapshot
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    /// Runs one action to completion, then writes the snapshot through if it
    /// changed.
    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        let name = action.name();
        debug!(action = name, "applying action");

        if let Some(missing) = self.missing_target(&action) {
            debug!(action = name, reason = %missing, "action target not found");
            return ActionOutcome::skipped(vec![CmdMessage::warning(missing)]);
        }

        let before = self.state.snapshot.clone();
        let state = std::mem::take(&mut self.state);
        let (state, created_id, mut messages) = self.reduce(state, action);
        self.state = state;

        let persisted = if self.state.snapshot != before {
            self.state.is_dirty = true;
            self.write_through(name, &mut messages)
        } else {
            Persisted::Skipped
        };

        ActionOutcome {
            created_id,
            messages,
            persisted,
        }
    }

    fn write_through(&mut self, name: &str, messages: &mut Vec<CmdMessage>) -> Persisted {
        match self.persistence.save(&self.state.snapshot) {
            Ok(()) => {
                self.state.is_dirty = false;
                Persisted::Saved
            }
            Err(err) => {
                warn!(action = name, error = %err, "failed to save notebooks, keeping in-memory state");
                messages.push(CmdMessage::warning(format!(
                    "Changes kept in memory but not saved: {}",
                    err
                )));
                Persisted::Failed(err.to_string())
            }
        }
    }

    fn reduce(
        &self,
        mut state: AppState,
        action: Action,
    ) -> (AppState, Option<String>, Vec<CmdMessage>) {
        let mut created = None;
        let mut messages = Vec::new();

        macro_rules! snapshot {
            ($op:expr) => {{
                let snapshot = std::mem::take(&mut state.snapshot);
                state.snapshot = $op(snapshot);
            }};
        }
        macro_rules! create {
            ($op:expr) => {{
                let snapshot = std::mem::take(&mut state.snapshot);
                let (snapshot, id) = $op(snapshot);
                state.snapshot = snapshot;
                created = id;
            }};
        }

        match action {
            Action::AddSection { notebook_id } => {
                create!(|s| sections::add(s, &notebook_id))
            }
            Action::RenameSection { section_id, title } => {
                snapshot!(|s| sections::rename(s, &section_id, &title))
            }
            Action::DeleteSection { section_id } => {
                snapshot!(|s| sections::delete(s, &section_id))
            }
            Action::AddPage { section_id } => create!(|s| pages::add(s, &section_id)),
            Action::UpdatePage { page_id, update } => {
                snapshot!(|s| pages::update(s, &page_id, update))
            }
            Action::DeletePage { page_id } => snapshot!(|s| pages::delete(s, &page_id)),
            Action::ToggleSubpage { page_id } => {
                snapshot!(|s| pages::toggle_subpage(s, &page_id))
            }
            Action::AddCopyBlock { page_id } => create!(|s| copy_blocks::add(s, &page_id)),
            Action::UpdateCopyBlock {
                page_id,
                block_id,
                update,
            } => snapshot!(|s| copy_blocks::update(s, &page_id, &block_id, update)),
            Action::DeleteCopyBlock { page_id, block_id } => {
                snapshot!(|s| copy_blocks::delete(s, &page_id, &block_id))
            }
            Action::AddSectionGroup {
                notebook_id,
                enclose_section,
            } => create!(|s| groups::add(s, &notebook_id, enclose_section.as_deref())),
            Action::RenameSectionGroup { group_id, title } => {
                snapshot!(|s| groups::rename(s, &group_id, &title))
            }
            Action::RemoveSectionGroup { group_id } => {
                snapshot!(|s| groups::remove(s, &group_id))
            }
            Action::ToggleSectionGroupCollapsed { group_id } => {
                snapshot!(|s| groups::toggle_collapsed(s, &group_id))
            }
            Action::ReorderSidebarItems { notebook_id, order } => {
                snapshot!(|s| sidebar::reorder_items(s, &notebook_id, order))
            }
            Action::MoveSectionToGroup {
                section_id,
                group_id,
                target_index,
            } => snapshot!(|s| sidebar::move_section_to_group(
                s,
                &section_id,
                group_id.as_deref(),
                target_index
            )),
            Action::DropOnSidebar {
                notebook_id,
                dragged_id,
                target_id,
                zone,
            } => {
                let command = state
                    .snapshot
                    .notebook(&notebook_id)
                    .and_then(|nb| sidebar::resolve_drop(nb, &dragged_id, &target_id, zone));
                match command {
                    Some(command) => snapshot!(|s| sidebar::apply(s, &notebook_id, command)),
                    None => messages.push(CmdMessage::info("Nothing to move")),
                }
            }
            Action::ReorderPages {
                section_id,
                dragged_id,
                target_id,
                position,
            } => snapshot!(|s| reorder::reorder_pages(
                s,
                &section_id,
                &dragged_id,
                &target_id,
                position
            )),
            Action::ReorderCopyAreas {
                page_id,
                dragged_id,
                target_id,
                position,
            } => snapshot!(|s| reorder::reorder_copy_areas(
                s,
                &page_id,
                &dragged_id,
                &target_id,
                position
            )),
            Action::SetActiveNotebook { notebook_id } => {
                snapshot!(|s| selection::set_active_notebook(s, &notebook_id))
            }
            Action::SetActiveSection { section_id } => {
                snapshot!(|s| selection::set_active_section(s, &section_id))
            }
            Action::SetActivePage { page_id } => {
                snapshot!(|s| selection::set_active_page(s, &page_id))
            }
            Action::PerformSearch { term } => {
                let (next, outcome) = search::perform(state, &term, &self.search);
                state = next;
                match outcome {
                    SearchOutcome::Found(n) => {
                        let noun = if n == 1 { "match" } else { "matches" };
                        messages.push(CmdMessage::info(format!("{} {}", n, noun)));
                    }
                    SearchOutcome::NotFound => {
                        state.toast_message = Some(NO_MATCHES_TOAST.to_string());
                        messages.push(CmdMessage::warning(NO_MATCHES_TOAST));
                    }
                    SearchOutcome::Cleared => {}
                }
            }
            Action::GoToNextResult => state = search::next(state),
            Action::JumpToResult(found) => state = search::jump_to(state, &found),
            Action::JumpToIndex(index) => state = search::jump_to_index(state, index),
            Action::ClearSearch => state = search::clear(state),
            Action::ShowToast(message) => state.toast_message = Some(message),
            Action::DismissToast => state.toast_message = None,
            Action::MarkSaved => state.is_dirty = false,
        }

        (state, created, messages)
    }

    /// Describes the first id an action names that does not resolve.
    fn missing_target(&self, action: &Action) -> Option<String> {
        let snapshot = &self.state.snapshot;
        let notebook = |id: &str| {
            snapshot
                .notebook(id)
                .is_none()
                .then(|| format!("Notebook not found: {}", id))
        };
        let section = |id: &str| {
            snapshot
                .find_section(id)
                .is_none()
                .then(|| format!("Section not found: {}", id))
        };
        let group = |id: &str| {
            snapshot
                .find_group(id)
                .is_none()
                .then(|| format!("Section group not found: {}", id))
        };
        let page = |id: &str| {
            snapshot
                .find_page(id)
                .is_none()
                .then(|| format!("Page not found: {}", id))
        };
        let block = |page_id: &str, block_id: &str| {
            page(page_id).or_else(|| {
                snapshot
                    .find_page(page_id)
                    .and_then(|(_, p)| p.copy_block(block_id))
                    .is_none()
                    .then(|| format!("Copy block not found: {}", block_id))
            })
        };

        match action {
            Action::AddSection { notebook_id }
            | Action::ReorderSidebarItems { notebook_id, .. }
            | Action::DropOnSidebar { notebook_id, .. }
            | Action::SetActiveNotebook { notebook_id } => notebook(notebook_id),
            Action::AddSectionGroup {
                notebook_id,
                enclose_section,
            } => notebook(notebook_id).or_else(|| {
                let id = enclose_section.as_deref()?;
                snapshot
                    .notebook(notebook_id)
                    .and_then(|nb| nb.section(id))
                    .is_none()
                    .then(|| format!("Section not found: {}", id))
            }),
            Action::RenameSection { section_id, .. }
            | Action::DeleteSection { section_id }
            | Action::AddPage { section_id }
            | Action::SetActiveSection { section_id } => section(section_id),
            Action::ReorderPages {
                section_id,
                dragged_id,
                ..
            } => section(section_id).or_else(|| {
                snapshot
                    .find_section(section_id)
                    .and_then(|(_, sec)| sec.page(dragged_id))
                    .is_none()
                    .then(|| format!("Page not found: {}", dragged_id))
            }),
            Action::MoveSectionToGroup {
                section_id,
                group_id,
                ..
            } => section(section_id).or_else(|| group_id.as_deref().and_then(group)),
            Action::RenameSectionGroup { group_id, .. }
            | Action::RemoveSectionGroup { group_id }
            | Action::ToggleSectionGroupCollapsed { group_id } => group(group_id),
            Action::UpdatePage { page_id, .. }
            | Action::DeletePage { page_id }
            | Action::ToggleSubpage { page_id }
            | Action::AddCopyBlock { page_id }
            | Action::SetActivePage { page_id } => page(page_id),
            Action::UpdateCopyBlock {
                page_id, block_id, ..
            }
            | Action::DeleteCopyBlock { page_id, block_id } => block(page_id, block_id),
            Action::ReorderCopyAreas {
                page_id,
                dragged_id,
                ..
            } => block(page_id, dragged_id),
            Action::JumpToResult(found) => snapshot
                .find_page(&found.page_id)
                .is_none()
                .then(|| format!("Page no longer exists: {}", found.page_id)),
            Action::JumpToIndex(index) => (*index >= self.state.search_results.len())
                .then(|| format!("No search result #{}", index + 1)),
            Action::PerformSearch { .. }
            | Action::GoToNextResult
            | Action::ClearSearch
            | Action::ShowToast(_)
            | Action::DismissToast
            | Action::MarkSaved => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::MatchField;
    use crate::persist::DEFAULT_STORAGE_KEY;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::fixture;

    fn store() -> NotebookStore<MemBackend> {
        let persistence = Persistence::new(MemBackend::new(), DEFAULT_STORAGE_KEY);
        persistence.save(&fixture().snapshot).unwrap();
        NotebookStore::new(persistence, SearchOptions::default())
    }

    fn writes(store: &NotebookStore<MemBackend>) -> usize {
        store.persistence().backend().write_count()
    }

    #[test]
    fn structural_action_writes_through() {
        let mut store = store();
        let outcome = store.apply(Action::AddPage {
            section_id: "sec-b".into(),
        });

        assert_eq!(outcome.persisted, Persisted::Saved);
        assert!(!store.state().is_dirty);
        let id = outcome.created_id.unwrap();
        assert_eq!(store.snapshot().active_page_id.as_deref(), Some(id.as_str()));

        let reloaded = store.persistence().load();
        assert!(reloaded.find_page(&id).is_some());
    }

    #[test]
    fn unknown_target_warns_and_skips() {
        let mut store = store();
        let before = store.snapshot().clone();
        let baseline = writes(&store);

        let outcome = store.apply(Action::DeletePage {
            page_id: "nope".into(),
        });

        assert_eq!(outcome.persisted, Persisted::Skipped);
        assert_eq!(outcome.messages[0].level, MessageLevel::Warning);
        assert_eq!(outcome.messages[0].content, "Page not found: nope");
        assert_eq!(store.snapshot(), &before);
        assert_eq!(writes(&store), baseline);
    }

    #[test]
    fn unknown_copy_block_is_reported() {
        let mut store = store();
        let outcome = store.apply(Action::DeleteCopyBlock {
            page_id: "pg-e".into(),
            block_id: "nope".into(),
        });
        assert_eq!(outcome.messages[0].content, "Copy block not found: nope");
    }

    #[test]
    fn no_op_action_is_not_written() {
        let mut store = store();
        let baseline = writes(&store);
        let outcome = store.apply(Action::RenameSection {
            section_id: "sec-a".into(),
            title: "   ".into(),
        });
        assert_eq!(outcome.persisted, Persisted::Skipped);
        assert_eq!(writes(&store), baseline);
    }

    #[test]
    fn failed_write_keeps_memory_state_and_dirty_flag() {
        let mut store = store();
        store.persistence().backend().set_simulate_write_error(true);

        let outcome = store.apply(Action::RenameSection {
            section_id: "sec-a".into(),
            title: "Renamed".into(),
        });

        assert!(matches!(outcome.persisted, Persisted::Failed(_)));
        assert!(store.state().is_dirty);
        assert_eq!(store.snapshot().find_section("sec-a").unwrap().1.title, "Renamed");
        assert_eq!(outcome.messages.last().unwrap().level, MessageLevel::Warning);

        store.apply(Action::MarkSaved);
        assert!(!store.state().is_dirty);
    }

    #[test]
    fn search_not_found_shows_toast() {
        let mut store = store();
        let outcome = store.apply(Action::PerformSearch { term: "zzz".into() });
        assert_eq!(store.state().toast_message.as_deref(), Some(NO_MATCHES_TOAST));
        assert_eq!(outcome.persisted, Persisted::Skipped);

        store.apply(Action::DismissToast);
        assert_eq!(store.state().toast_message, None);
    }

    #[test]
    fn search_jump_persists_selection_change() {
        let mut store = store();
        let outcome = store.apply(Action::PerformSearch {
            term: "second".into(),
        });
        assert_eq!(outcome.messages[0].content, "1 match");
        assert_eq!(outcome.persisted, Persisted::Saved);
        assert_eq!(store.snapshot().active_page_id.as_deref(), Some("pg-e"));

        let current = store.state().current_match().unwrap().clone();
        assert_eq!(current.field_name, MatchField::CopyArea);
        assert_eq!(current.label(), "copy-block-2");
    }

    #[test]
    fn mutations_leave_search_results_stale() {
        let mut store = store();
        store.apply(Action::PerformSearch {
            term: "second".into(),
        });
        store.apply(Action::DeletePage {
            page_id: "pg-e".into(),
        });
        assert_eq!(store.state().search_results.len(), 1);

        let found = store.state().search_results[0].clone();
        let outcome = store.apply(Action::JumpToResult(found));
        assert_eq!(outcome.messages[0].content, "Page no longer exists: pg-e");
    }

    #[test]
    fn drop_on_sidebar_resolves_and_applies() {
        let mut store = store();
        store.apply(Action::DropOnSidebar {
            notebook_id: "nb".into(),
            dragged_id: "sec-b".into(),
            target_id: "grp".into(),
            zone: DropZone::Inside,
        });
        let nb = store.snapshot().notebook("nb").unwrap();
        assert_eq!(nb.section("sec-b").unwrap().group_id.as_deref(), Some("grp"));
        assert!(nb.sidebar_position("sec-b").is_none());

        let outcome = store.apply(Action::DropOnSidebar {
            notebook_id: "nb".into(),
            dragged_id: "sec-a".into(),
            target_id: "sec-a".into(),
            zone: DropZone::Before,
        });
        assert_eq!(outcome.persisted, Persisted::Skipped);
        assert_eq!(outcome.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn toasts_are_not_persisted() {
        let mut store = store();
        let baseline = writes(&store);
        store.apply(Action::ShowToast("Copied".into()));
        assert_eq!(store.state().toast_message.as_deref(), Some("Copied"));
        assert_eq!(writes(&store), baseline);

        let blob = store.persistence().backend().blob(DEFAULT_STORAGE_KEY).unwrap();
        assert!(!blob.contains("toastMessage"));
        assert!(!blob.contains("searchResults"));
    }
}
