//! # CLI Behavior
//!
//! This is **one possible UI client** for binder, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Naked Execution
//!
//! Running `binder` with no arguments defaults to `binder tree`: the active
//! notebook with its groups, sections and pages.
//!
//! ## Ids
//!
//! Entities are addressed by id. The tree prints the first eight characters
//! of each id, and any unique prefix is accepted wherever an id is expected.
//! An id that matches nothing is passed through untouched, so the store
//! reports it as not found and the command exits successfully.
//!
//! ## Module Structure
//!
//! - `commands`: dispatch, id resolution, calls into the store
//! - `render`: tree, page and search-result output
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
