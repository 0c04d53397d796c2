//! # Command Layer
//!
//! This module contains the **core business logic** of binder: the mutation,
//! ordering and search engines. Each concern lives in its own submodule and is
//! written as plain functions over model types.
//!
//! ## Snapshot In, Snapshot Out
//!
//! Every structural operation takes a [`Snapshot`](crate::model::Snapshot) by
//! value and returns the next snapshot. Ownership is the copy-on-write
//! boundary: a caller that still needs the previous state keeps a clone, and no
//! operation can reach into a substructure somebody else holds.
//!
//! Creation operations return `(Snapshot, Option<String>)`: the new entity's id,
//! or `None` when the owner could not be found.
//!
//! ## Silent No-Ops
//!
//! The engines never fail. An id that does not resolve leaves the snapshot
//! unchanged, and a reorder whose target vanished appends at the end. Reporting
//! such cases to a user is the job of the store and the UI.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O**: persistence is triggered by the store, never from here
//! - **Logging**: the store traces actions, the engines stay quiet
//! - **Search refresh**: search results go stale after a mutation, by contract
//!
//! ## Command Modules
//!
//! - [`sections`]: add, rename, delete sections
//! - [`groups`]: add, rename, remove (ungroup) and collapse section groups
//! - [`pages`]: add, update, delete pages and toggle subpage state
//! - [`copy_blocks`]: add, update, delete copy blocks
//! - [`selection`]: active notebook/section/page pointers and their repair
//! - [`sidebar`]: top-level ordering, group membership and drop resolution
//! - [`reorder`]: block-aware page reordering and copy-block reordering
//! - [`search`]: match scanning and result navigation
//! - [`helpers`]: index lookups shared by the modules above

use crate::model::CopyBlock;
use serde::Serialize;

pub mod copy_blocks;
pub mod groups;
pub mod helpers;
pub mod pages;
pub mod reorder;
pub mod search;
pub mod sections;
pub mod selection;
pub mod sidebar;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Fields to merge over an existing page. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub copy_areas: Option<Vec<CopyBlock>>,
    pub is_subpage: Option<bool>,
}

impl PageUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_copy_areas(mut self, copy_areas: Vec<CopyBlock>) -> Self {
        self.copy_areas = Some(copy_areas);
        self
    }

    pub fn with_subpage(mut self, is_subpage: bool) -> Self {
        self.is_subpage = Some(is_subpage);
        self
    }
}

/// Fields to merge over an existing copy block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyBlockUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CopyBlockUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}
