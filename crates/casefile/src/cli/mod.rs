//! Command-line interface for casefile.
//!
//! This module provides the CLI structure and command handlers for the
//! `casefile` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AccountCommand, AddCommand, AuthArgs, ConfigCommand, ListCommand, OutputFormat,
    RecordKindArg, RmCommand, ServeCommand, StatusCommand,
};

/// casefile - Evidence cataloging portal
///
/// Catalogs photo, video, text, and criminal-profile evidence records in a
/// single shared document, synced through the evidence API.
#[derive(Debug, Parser)]
#[command(name = "casefile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the evidence API server
    Serve(ServeCommand),

    /// Show record counts and store status
    Status(StatusCommand),

    /// List evidence records
    List(ListCommand),

    /// Add an evidence record
    #[command(subcommand)]
    Add(AddCommand),

    /// Remove an evidence record
    Rm(RmCommand),

    /// Manage accounts
    #[command(subcommand)]
    Account(AccountCommand),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
