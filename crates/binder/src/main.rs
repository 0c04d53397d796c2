//! # Binder CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/binderapp/`: the notebook engine, UI agnostic
//! - `crates/binder/`: this CLI, one possible client of `binderapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/binder/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - id resolution + action dispatch (commands.rs)            │
//! │  - terminal rendering with colored (render.rs)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (crates/binderapp/src/api.rs)                        │
//! │  - apply(Action) -> ActionOutcome, writes through on change │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every invocation loads the store, applies the actions one command needs,
//! and renders the outcome. Nothing below the CLI layer touches stdout.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
