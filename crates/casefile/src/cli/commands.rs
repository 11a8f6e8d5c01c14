//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::record::RecordKind;

/// Credentials for commands that mutate evidence.
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Username to log in as
    #[arg(long)]
    pub user: String,

    /// Password for the account
    #[arg(short, long)]
    pub password: String,
}

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the configured bind address
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list records of this kind; all kinds when omitted
    #[arg(value_enum)]
    pub kind: Option<RecordKindArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Record creation commands, one per kind.
#[derive(Debug, Subcommand)]
pub enum AddCommand {
    /// Add a photo record
    Photo {
        /// Title of the photo
        title: String,

        /// Description of what the photo shows
        #[arg(short, long, default_value = "")]
        description: String,

        /// URL of the image
        #[arg(short, long)]
        url: String,

        /// Evidence date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Add a video record
    Video {
        /// Title of the video
        title: String,

        /// Description of what the video shows
        #[arg(short, long, default_value = "")]
        description: String,

        /// URL of the video
        #[arg(short, long)]
        url: String,

        /// Thumbnail data URL; when omitted one is captured from the video
        #[arg(long, default_value = "")]
        thumbnail: String,

        /// Evidence date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Add a text record
    Text {
        /// Title of the note
        title: String,

        /// The note content
        #[arg(long)]
        content: String,

        /// Evidence date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Add a criminal profile
    Criminal {
        /// Full name
        name: String,

        /// Age in years
        #[arg(long, default_value_t = 0)]
        age: u32,

        /// Charges on file
        #[arg(long, default_value = "")]
        charges: String,

        /// Case status (e.g. "at large", "in custody")
        #[arg(short, long, default_value = "")]
        status: String,

        /// URL of a profile photo
        #[arg(long, default_value = "")]
        photo: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Evidence date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RmCommand {
    /// Kind of record to remove
    #[arg(value_enum)]
    pub kind: RecordKindArg,

    /// Record id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub auth: AuthArgs,
}

/// Account management commands.
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Hash a password for use in the config account table
    Hash {
        /// The password to hash
        password: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Record kind argument for filtering and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKindArg {
    /// Photo records
    Photo,
    /// Video records
    Video,
    /// Text records
    Text,
    /// Criminal profiles
    Criminal,
}

impl From<RecordKindArg> for RecordKind {
    fn from(arg: RecordKindArg) -> Self {
        match arg {
            RecordKindArg::Photo => Self::Photo,
            RecordKindArg::Video => Self::Video,
            RecordKindArg::Text => Self::Text,
            RecordKindArg::Criminal => Self::Criminal,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
