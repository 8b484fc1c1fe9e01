use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Main command-line interface for the Fixit repair assistant
///
/// Fixit diagnoses a broken object from a photo, generates an illustrated
/// step-by-step repair blueprint through a generative-AI backend, walks you
/// through the steps (with live troubleshooting when you get stuck), and
/// optionally shares the finished repair to the public feed after content
/// moderation.
#[derive(Parser)]
#[command(version, about, name = "fixit")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/fixit/repairs.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of the analysis backend
    #[arg(long, global = true, env = "FIXIT_API_URL")]
    pub api_url: Option<String>,

    /// Per-request timeout for backend calls, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Fixit CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose a photo and create a repair blueprint
    #[command(alias = "a")]
    Analyze {
        /// Path to a JPEG photo of the broken object
        photo: PathBuf,
        /// Optional free-text description of the issue
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List all saved repairs
    #[command(alias = "ls")]
    List,
    /// List publicly shared repairs
    Feed,
    /// Show one repair document in full
    Show {
        /// Repair document ID
        repair_id: String,
    },
    /// Walk through a repair's steps interactively
    #[command(alias = "w")]
    Walk {
        /// Repair document ID
        repair_id: String,
    },
    /// Finish a repair: record the outcome and decide visibility
    Publish {
        /// Repair document ID
        repair_id: String,
        /// Requested visibility
        #[arg(long, value_enum, default_value_t = VisibilityArg::Private)]
        visibility: VisibilityArg,
        /// Did the repair work? Defaults to ongoing
        #[arg(long, value_enum)]
        outcome: Option<OutcomeArg>,
    },
    /// Delete a repair document
    Delete {
        /// Repair document ID
        repair_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisibilityArg {
    Public,
    Private,
}

impl From<VisibilityArg> for fixit_core::Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Public => fixit_core::Visibility::Public,
            VisibilityArg::Private => fixit_core::Visibility::Private,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    Success,
    Failure,
    Ongoing,
}

impl OutcomeArg {
    /// Maps to the document's tri-state outcome field.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            OutcomeArg::Success => Some(true),
            OutcomeArg::Failure => Some(false),
            OutcomeArg::Ongoing => None,
        }
    }
}
