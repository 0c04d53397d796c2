//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: logging, configuration and the store via `initialize`
//! 3. **Id Resolution**: unique prefixes into full ids
//! 4. **Dispatch**: one or two `Action`s per command through `NotebookStore::apply`
//! 5. **Output Formatting**: messages, trees, pages and search results
//!
//! Business rules stay in `binderapp`: an id that resolves to nothing is
//! still handed to the store, which answers with a "not found" warning.

use super::render::{print_messages, render_page, render_search, render_tree, short_id};
use super::setup::{
    join_words, Cli, Commands, CopyCommands, GroupCommands, PageCommands, SectionCommands,
};
use binderapp::api::{Action, ActionOutcome, NotebookStore, Persisted};
use binderapp::commands::{CmdMessage, CopyBlockUpdate, PageUpdate};
use binderapp::error::Result;
use binderapp::init::initialize;
use binderapp::model::Snapshot;
use binderapp::store::fs_backend::FsBackend;
use clap::Parser;
use tracing_subscriber::EnvFilter;

struct AppContext {
    store: NotebookStore<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        None | Some(Commands::Tree) => handle_tree(&ctx),
        Some(Commands::Use { id }) => handle_use(&mut ctx, &id),
        Some(Commands::Search { jump, term }) => handle_search(&mut ctx, term.join(" "), jump),
        Some(Commands::Section { action }) => handle_section(&mut ctx, action),
        Some(Commands::Group { action }) => handle_group(&mut ctx, action),
        Some(Commands::Page { action }) => handle_page(&mut ctx, action),
        Some(Commands::Copy { action }) => handle_copy(&mut ctx, action),
    }
    Ok(())
}

/// Logs go to stderr. `RUST_LOG` picks the filter, `-v` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let ctx = initialize(cli.data.clone())?;
    tracing::debug!(data_dir = %ctx.data_dir.display(), "binder context ready");
    Ok(AppContext { store: ctx.store })
}

// =============================================================================
// Id resolution
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Notebook,
    Group,
    Section,
    Page,
    Block,
}

fn candidate_ids(snapshot: &Snapshot, kind: Kind) -> Vec<&str> {
    let notebooks = snapshot.notebooks.iter();
    match kind {
        Kind::Notebook => notebooks.map(|nb| nb.id.as_str()).collect(),
        Kind::Group => notebooks
            .flat_map(|nb| &nb.section_groups)
            .map(|g| g.id.as_str())
            .collect(),
        Kind::Section => notebooks
            .flat_map(|nb| &nb.sections)
            .map(|s| s.id.as_str())
            .collect(),
        Kind::Page => notebooks
            .flat_map(|nb| &nb.sections)
            .flat_map(|s| &s.pages)
            .map(|p| p.id.as_str())
            .collect(),
        Kind::Block => notebooks
            .flat_map(|nb| &nb.sections)
            .flat_map(|s| &s.pages)
            .flat_map(|p| &p.copy_areas)
            .map(|b| b.id.as_str())
            .collect(),
    }
}

/// Expands a unique id prefix. Anything else comes back unchanged.
fn resolve(snapshot: &Snapshot, kind: Kind, input: &str) -> String {
    lookup(snapshot, kind, input).unwrap_or_else(|| input.to_string())
}

/// The full id `input` names, if it names exactly one entity of `kind`.
fn lookup(snapshot: &Snapshot, kind: Kind, input: &str) -> Option<String> {
    let ids = candidate_ids(snapshot, kind);
    if ids.contains(&input) {
        return Some(input.to_string());
    }
    let mut matching = ids.into_iter().filter(|id| id.starts_with(input));
    match (matching.next(), matching.next()) {
        (Some(id), None) => Some(id.to_string()),
        _ => None,
    }
}

/// The page holding copy block `block_id`.
fn block_owner(snapshot: &Snapshot, block_id: &str) -> Option<String> {
    snapshot
        .notebooks
        .iter()
        .flat_map(|nb| &nb.sections)
        .flat_map(|s| &s.pages)
        .find(|p| p.copy_block(block_id).is_some())
        .map(|p| p.id.clone())
}

/// The notebook owning a section or group.
fn sidebar_owner(snapshot: &Snapshot, id: &str) -> Option<String> {
    snapshot
        .find_section(id)
        .map(|(nb, _)| nb.id.clone())
        .or_else(|| snapshot.find_group(id).map(|(nb, _)| nb.id.clone()))
}

fn warn(message: impl Into<String>) {
    print_messages(&[CmdMessage::warning(message)]);
}

// =============================================================================
// Store access
// =============================================================================

/// Applies one action and prints the store's messages.
fn apply(ctx: &mut AppContext, action: Action) -> ActionOutcome {
    let outcome = ctx.store.apply(action);
    print_messages(&outcome.messages);
    outcome
}

/// Like [`apply`], then prints `done` if the notebook changed and was saved.
fn apply_and_report(ctx: &mut AppContext, action: Action, done: impl Into<String>) {
    let outcome = apply(ctx, action);
    if outcome.persisted == Persisted::Saved {
        print_messages(&[CmdMessage::success(done)]);
    }
}

fn active_notebook_id(ctx: &AppContext) -> Option<String> {
    ctx.store.snapshot().active_notebook().map(|nb| nb.id.clone())
}

// =============================================================================
// Handlers
// =============================================================================

fn handle_tree(ctx: &AppContext) {
    print!("{}", render_tree(ctx.store.snapshot()));
}

fn handle_use(ctx: &mut AppContext, input: &str) {
    let snapshot = ctx.store.snapshot();
    let action = if let Some(notebook_id) = lookup(snapshot, Kind::Notebook, input) {
        Action::SetActiveNotebook { notebook_id }
    } else if let Some(section_id) = lookup(snapshot, Kind::Section, input) {
        Action::SetActiveSection { section_id }
    } else if let Some(page_id) = lookup(snapshot, Kind::Page, input) {
        Action::SetActivePage { page_id }
    } else {
        warn(format!("Nothing matches: {}", input));
        return;
    };

    apply(ctx, action);
    handle_tree(ctx);
}

fn handle_search(ctx: &mut AppContext, term: String, jump: Option<usize>) {
    let outcome = ctx.store.apply(Action::PerformSearch { term });

    if let Some(n) = jump {
        match n.checked_sub(1) {
            Some(index) => {
                apply(ctx, Action::JumpToIndex(index));
            }
            None => warn("Results count from 1"),
        }
    }

    print!("{}", render_search(ctx.store.state()));
    print_messages(&outcome.messages);
}

fn handle_section(ctx: &mut AppContext, action: SectionCommands) {
    match action {
        SectionCommands::Add { title } => {
            let Some(notebook_id) = active_notebook_id(ctx) else {
                warn("No active notebook");
                return;
            };
            let Some(id) = apply(ctx, Action::AddSection { notebook_id }).created_id else {
                return;
            };
            if let Some(title) = join_words(&title) {
                apply(
                    ctx,
                    Action::RenameSection {
                        section_id: id.clone(),
                        title,
                    },
                );
            }
            print_messages(&[CmdMessage::success(format!(
                "Added section {}",
                short_id(&id)
            ))]);
        }
        SectionCommands::Rename { id, title } => {
            let section_id = resolve(ctx.store.snapshot(), Kind::Section, &id);
            apply_and_report(
                ctx,
                Action::RenameSection {
                    section_id,
                    title: title.join(" "),
                },
                "Section renamed",
            );
        }
        SectionCommands::Delete { id } => {
            let section_id = resolve(ctx.store.snapshot(), Kind::Section, &id);
            apply_and_report(ctx, Action::DeleteSection { section_id }, "Section deleted");
        }
        SectionCommands::Move { id, group, index } => {
            let snapshot = ctx.store.snapshot();
            let section_id = resolve(snapshot, Kind::Section, &id);
            let group_id = group.map(|g| resolve(snapshot, Kind::Group, &g));
            let done = if group_id.is_some() {
                "Section moved into group"
            } else {
                "Section moved to the top level"
            };
            apply_and_report(
                ctx,
                Action::MoveSectionToGroup {
                    section_id,
                    group_id,
                    target_index: index,
                },
                done,
            );
        }
        SectionCommands::Drop {
            dragged,
            target,
            zone,
        } => {
            let snapshot = ctx.store.snapshot();
            let dragged_id = lookup(snapshot, Kind::Section, &dragged)
                .or_else(|| lookup(snapshot, Kind::Group, &dragged));
            let Some(dragged_id) = dragged_id else {
                warn(format!("Nothing matches: {}", dragged));
                return;
            };
            let target_id = lookup(snapshot, Kind::Section, &target)
                .or_else(|| lookup(snapshot, Kind::Group, &target))
                .unwrap_or(target);
            let Some(notebook_id) = sidebar_owner(snapshot, &dragged_id) else {
                return;
            };
            apply_and_report(
                ctx,
                Action::DropOnSidebar {
                    notebook_id,
                    dragged_id,
                    target_id,
                    zone: zone.into(),
                },
                "Sidebar reordered",
            );
        }
    }
}

fn handle_group(ctx: &mut AppContext, action: GroupCommands) {
    match action {
        GroupCommands::Add { enclose, title } => {
            let Some(notebook_id) = active_notebook_id(ctx) else {
                warn("No active notebook");
                return;
            };
            let enclose_section =
                enclose.map(|id| resolve(ctx.store.snapshot(), Kind::Section, &id));
            let outcome = apply(
                ctx,
                Action::AddSectionGroup {
                    notebook_id,
                    enclose_section,
                },
            );
            let Some(id) = outcome.created_id else {
                return;
            };
            if let Some(title) = join_words(&title) {
                apply(
                    ctx,
                    Action::RenameSectionGroup {
                        group_id: id.clone(),
                        title,
                    },
                );
            }
            print_messages(&[CmdMessage::success(format!(
                "Added group {}",
                short_id(&id)
            ))]);
        }
        GroupCommands::Rename { id, title } => {
            let group_id = resolve(ctx.store.snapshot(), Kind::Group, &id);
            apply_and_report(
                ctx,
                Action::RenameSectionGroup {
                    group_id,
                    title: title.join(" "),
                },
                "Group renamed",
            );
        }
        GroupCommands::Remove { id } => {
            let group_id = resolve(ctx.store.snapshot(), Kind::Group, &id);
            apply_and_report(
                ctx,
                Action::RemoveSectionGroup { group_id },
                "Group removed, its sections are top level again",
            );
        }
        GroupCommands::Toggle { id } => {
            let group_id = resolve(ctx.store.snapshot(), Kind::Group, &id);
            apply_and_report(
                ctx,
                Action::ToggleSectionGroupCollapsed { group_id },
                "Group toggled",
            );
        }
    }
}

fn handle_page(ctx: &mut AppContext, action: PageCommands) {
    match action {
        PageCommands::Add { section, sub, title } => {
            let snapshot = ctx.store.snapshot();
            let section_id = match section {
                Some(id) => resolve(snapshot, Kind::Section, &id),
                None => match &snapshot.active_section_id {
                    Some(id) => id.clone(),
                    None => {
                        warn("No active section");
                        return;
                    }
                },
            };
            let Some(id) = apply(ctx, Action::AddPage { section_id }).created_id else {
                return;
            };
            let mut update = PageUpdate::new();
            if let Some(title) = join_words(&title) {
                update = update.with_title(title);
            }
            if sub {
                update = update.with_subpage(true);
            }
            if update != PageUpdate::new() {
                apply(
                    ctx,
                    Action::UpdatePage {
                        page_id: id.clone(),
                        update,
                    },
                );
            }
            print_messages(&[CmdMessage::success(format!(
                "Added page {}",
                short_id(&id)
            ))]);
        }
        PageCommands::Show { id } => {
            let snapshot = ctx.store.snapshot();
            let page_id = match id {
                Some(id) => resolve(snapshot, Kind::Page, &id),
                None => match &snapshot.active_page_id {
                    Some(id) => id.clone(),
                    None => {
                        warn("No active page");
                        return;
                    }
                },
            };
            match snapshot.find_page(&page_id) {
                Some((section, page)) => print!("{}", render_page(section, page)),
                None => warn(format!("Page not found: {}", page_id)),
            }
        }
        PageCommands::Edit { id, title, content } => {
            let page_id = resolve(ctx.store.snapshot(), Kind::Page, &id);
            let mut update = PageUpdate::new();
            if let Some(title) = title {
                update = update.with_title(title);
            }
            if let Some(content) = content {
                update = update.with_content(content);
            }
            if update == PageUpdate::new() {
                print_messages(&[CmdMessage::info("Nothing to change")]);
                return;
            }
            apply_and_report(ctx, Action::UpdatePage { page_id, update }, "Page updated");
        }
        PageCommands::Delete { id } => {
            let page_id = resolve(ctx.store.snapshot(), Kind::Page, &id);
            apply_and_report(ctx, Action::DeletePage { page_id }, "Page deleted");
        }
        PageCommands::Sub { id } => {
            let page_id = resolve(ctx.store.snapshot(), Kind::Page, &id);
            apply_and_report(ctx, Action::ToggleSubpage { page_id }, "Subpage toggled");
        }
        PageCommands::Move {
            dragged,
            target,
            position,
        } => {
            let snapshot = ctx.store.snapshot();
            let dragged_id = resolve(snapshot, Kind::Page, &dragged);
            let target_id = resolve(snapshot, Kind::Page, &target);
            let Some((section, _)) = snapshot.find_page(&dragged_id) else {
                warn(format!("Page not found: {}", dragged));
                return;
            };
            let section_id = section.id.clone();
            apply_and_report(
                ctx,
                Action::ReorderPages {
                    section_id,
                    dragged_id,
                    target_id,
                    position: position.into(),
                },
                "Pages reordered",
            );
        }
    }
}

fn handle_copy(ctx: &mut AppContext, action: CopyCommands) {
    match action {
        CopyCommands::Add { page, content } => {
            let snapshot = ctx.store.snapshot();
            let page_id = match page {
                Some(id) => resolve(snapshot, Kind::Page, &id),
                None => match &snapshot.active_page_id {
                    Some(id) => id.clone(),
                    None => {
                        warn("No active page");
                        return;
                    }
                },
            };
            let outcome = apply(
                ctx,
                Action::AddCopyBlock {
                    page_id: page_id.clone(),
                },
            );
            let Some(id) = outcome.created_id else {
                return;
            };
            if let Some(content) = join_words(&content) {
                apply(
                    ctx,
                    Action::UpdateCopyBlock {
                        page_id,
                        block_id: id.clone(),
                        update: CopyBlockUpdate::new().with_content(content),
                    },
                );
            }
            print_messages(&[CmdMessage::success(format!(
                "Added copy block {}",
                short_id(&id)
            ))]);
        }
        CopyCommands::Set { id, title, content } => {
            let Some((page_id, block_id)) = locate_block(ctx, &id) else {
                return;
            };
            let mut update = CopyBlockUpdate::new();
            if let Some(title) = title {
                update = update.with_title(title);
            }
            if let Some(content) = content {
                update = update.with_content(content);
            }
            if update == CopyBlockUpdate::new() {
                print_messages(&[CmdMessage::info("Nothing to change")]);
                return;
            }
            apply_and_report(
                ctx,
                Action::UpdateCopyBlock {
                    page_id,
                    block_id,
                    update,
                },
                "Copy block updated",
            );
        }
        CopyCommands::Delete { id } => {
            let Some((page_id, block_id)) = locate_block(ctx, &id) else {
                return;
            };
            let outcome = apply(ctx, Action::DeleteCopyBlock { page_id, block_id });
            if outcome.persisted == Persisted::Saved {
                print_messages(&[CmdMessage::success("Copy block deleted")]);
            } else if outcome.messages.is_empty() {
                print_messages(&[CmdMessage::info("A page keeps at least one copy block")]);
            }
        }
        CopyCommands::Move {
            dragged,
            target,
            position,
        } => {
            let Some((page_id, dragged_id)) = locate_block(ctx, &dragged) else {
                return;
            };
            let target_id = resolve(ctx.store.snapshot(), Kind::Block, &target);
            apply_and_report(
                ctx,
                Action::ReorderCopyAreas {
                    page_id,
                    dragged_id,
                    target_id,
                    position: position.into(),
                },
                "Copy blocks reordered",
            );
        }
    }
}

/// Resolves a copy block id to `(page_id, block_id)`, warning when it is
/// unknown.
fn locate_block(ctx: &AppContext, input: &str) -> Option<(String, String)> {
    let snapshot = ctx.store.snapshot();
    let block_id = resolve(snapshot, Kind::Block, input);
    match block_owner(snapshot, &block_id) {
        Some(page_id) => Some((page_id, block_id)),
        None => {
            warn(format!("Copy block not found: {}", input));
            None
        }
    }
}
