//! # Binder Architecture
//!
//! Binder is a **UI-agnostic notebook engine**: notebooks hold sections and
//! section groups, sections hold pages, pages hold copy blocks. Every
//! collection can be reordered by drag-and-drop and the whole forest can be
//! searched. The `binder` CLI is one client; the engine assumes nothing about
//! terminals.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/binder)                                        │
//! │  - Parses arguments, renders trees and results              │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (api.rs)                                             │
//! │  - One AppState, changed only by apply(Action)              │
//! │  - Checks targets, writes through on change                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure functions: Snapshot in, Snapshot out                │
//! │  - Mutation, ordering, selection and search engines         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence (persist.rs, migrate.rs, store/)               │
//! │  - One JSON blob per storage key                            │
//! │  - Legacy shapes migrated on load, seed on failure          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Engines Never Fail
//!
//! An id that does not resolve leaves the snapshot unchanged. A reorder whose
//! target vanished appends. A blob that cannot be read becomes the seed. Only
//! I/O, configuration and initialization return [`error::Result`].
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests next to each engine, on the shared
//!    `test_utils` fixture. Most of the testing lives here.
//! 2. **Store**: dispatch, target checks and write-through over `MemBackend`.
//! 3. **Integration** (`tests/`): filesystem backend, migration of stored
//!    blobs, full store flows.
//!
//! ## Module Overview
//!
//! - [`model`]: entity types and the wire format
//! - [`commands`]: the engines
//! - [`api`]: [`api::NotebookStore`] and the [`api::Action`] surface
//! - [`text`]: plain-text projection and char-based matching
//! - [`migrate`]: legacy blob migration
//! - [`persist`]: load/save with seed fallback
//! - [`store`]: blob transports
//! - [`config`], [`init`]: configuration and wiring
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod migrate;
pub mod model;
pub mod persist;
pub mod store;
pub mod text;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
