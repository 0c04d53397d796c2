use binderapp::commands::sidebar::DropZone;
use binderapp::model::DropPosition;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "binder",
    bin_name = "binder",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Notebooks, sections and pages from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the notebook data
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Where a dragged page or copy block lands relative to its target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Position {
    Before,
    After,
}

impl From<Position> for DropPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Before => DropPosition::Before,
            Position::After => DropPosition::After,
        }
    }
}

/// Where a dragged sidebar item lands relative to its target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Zone {
    Before,
    After,
    Inside,
}

impl From<Zone> for DropZone {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Before => DropZone::Before,
            Zone::After => DropZone::After,
            Zone::Inside => DropZone::Inside,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active notebook (default)
    #[command(alias = "ls", display_order = 1)]
    Tree,

    /// Select a notebook, section or page
    #[command(display_order = 2)]
    Use {
        /// Id (or unique id prefix) of a notebook, section or page
        id: String,
    },

    /// Search titles, page bodies and copy blocks
    #[command(alias = "s", display_order = 3)]
    Search {
        /// Jump to the Nth result (counting from 1)
        #[arg(long, short = 'j', value_name = "N")]
        jump: Option<usize>,

        /// Search words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        term: Vec<String>,
    },

    /// Manage sections
    #[command(display_order = 10)]
    Section {
        #[command(subcommand)]
        action: SectionCommands,
    },

    /// Manage section groups
    #[command(display_order = 11)]
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },

    /// Manage pages
    #[command(display_order = 12)]
    Page {
        #[command(subcommand)]
        action: PageCommands,
    },

    /// Manage copy blocks
    #[command(display_order = 13)]
    Copy {
        #[command(subcommand)]
        action: CopyCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SectionCommands {
    /// Add a section to the active notebook
    Add {
        /// Title words
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Rename a section
    Rename {
        id: String,
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Delete a section and its pages
    #[command(alias = "rm")]
    Delete { id: String },

    /// Move a section into a group, or back to the top level
    Move {
        id: String,

        /// Target group (omit to move to the top level)
        #[arg(long, short = 'g')]
        group: Option<String>,

        /// Position in the sidebar (counting from 0)
        #[arg(long, short = 'i')]
        index: Option<usize>,
    },

    /// Drop a section or group onto another sidebar item
    Drop {
        /// The dragged section or group
        dragged: String,

        /// The section or group dropped on
        target: String,

        #[arg(long, short = 'z', value_enum, default_value_t = Zone::After)]
        zone: Zone,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Add a section group, optionally wrapping an existing section
    Add {
        /// Section to enclose in the new group
        #[arg(long, short = 'e')]
        enclose: Option<String>,

        /// Title words
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Rename a group
    Rename {
        id: String,
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Dissolve a group, releasing its sections into its sidebar slot
    #[command(alias = "rm")]
    Remove { id: String },

    /// Collapse or expand a group
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PageCommands {
    /// Add a page to a section (the active one by default)
    Add {
        #[arg(long, short = 's')]
        section: Option<String>,

        /// Create the page as a subpage
        #[arg(long)]
        sub: bool,

        /// Title words
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Show a page (the active one by default)
    #[command(alias = "v")]
    Show { id: Option<String> },

    /// Change a page's title or body
    Edit {
        id: String,

        #[arg(long, short = 't')]
        title: Option<String>,

        /// New body, as HTML
        #[arg(long, short = 'c')]
        content: Option<String>,
    },

    /// Delete a page
    #[command(alias = "rm")]
    Delete { id: String },

    /// Turn a page into a subpage, or back
    Sub { id: String },

    /// Move a page (with its subpages) before or after another page
    Move {
        dragged: String,
        target: String,

        #[arg(long, short = 'p', value_enum, default_value_t = Position::After)]
        position: Position,
    },
}

#[derive(Subcommand, Debug)]
pub enum CopyCommands {
    /// Add a copy block to a page (the active one by default)
    Add {
        #[arg(long, short = 'p')]
        page: Option<String>,

        /// Block content words
        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// Change a copy block's title or content
    Set {
        id: String,

        #[arg(long, short = 't')]
        title: Option<String>,

        #[arg(long, short = 'c')]
        content: Option<String>,
    },

    /// Delete a copy block (a page always keeps one)
    #[command(alias = "rm")]
    Delete { id: String },

    /// Move a copy block before or after another one on the same page
    Move {
        dragged: String,
        target: String,

        #[arg(long, short = 'p', value_enum, default_value_t = Position::After)]
        position: Position,
    },
}

/// Joins trailing title words, `None` when there are none.
pub fn join_words(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
