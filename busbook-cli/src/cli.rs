//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BookCommand, CancelCommand, CheckinCommand, CompletionsCommand, InitCommand, ListCommand,
    RebookCommand, ReportCommand, ResetCommand, RolloverCommand, SeatsCommand, UserCommand,
};
use busbook::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for the staff bus seat booking ledger.
#[derive(Parser)]
#[command(name = "busbook")]
#[command(version, about = "Manage staff bus seat bookings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "BUSBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the database lock wait (in seconds)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    /// Output format for listings: table, json, csv or tsv
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Book a seat on one or two travel dates
    Book(BookCommand),

    /// Book a seat on one date, overwriting the passenger's own record
    Rebook(RebookCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Mark a passenger as boarded
    Checkin(CheckinCommand),

    /// List reservations
    List(ListCommand),

    /// Show the seat map for a travel date
    Seats(SeatsCommand),

    /// Summarize bookings by destination
    Report(ReportCommand),

    /// Delete every reservation
    Reset(ResetCommand),

    /// Show, update and list passenger profiles
    User(UserCommand),

    /// Manage rollover requests
    Rollover(RolloverCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
