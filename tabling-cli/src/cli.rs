//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BookCommand, CompletionsCommand, InitCommand, ListCommand, OrderCommand, SeatCommand,
    ShowDataDirCommand, TableCommand, TransitionArgs, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reservation lifecycle and table allocation for restaurant staff terminals.
#[derive(Parser)]
#[command(name = "tabling")]
#[command(
    version,
    about = "Manage restaurant reservations and table allocation",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TABLING_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// How long to wait for another terminal's lock (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TABLING_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "TABLING_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Manage the floor plan
    #[command(subcommand)]
    Table(TableCommand),

    /// Book a table (or combined tables) for a party
    Book(BookCommand),

    /// Confirm a pending reservation and hold its tables
    Confirm(TransitionArgs),

    /// Seat a confirmed reservation
    Seat(SeatCommand),

    /// Complete a seated visit and release its tables
    Complete(TransitionArgs),

    /// Cancel a reservation
    Cancel(TransitionArgs),

    /// Mark a reservation as a no-show
    NoShow(TransitionArgs),

    /// Open, close and list orders
    #[command(subcommand)]
    Order(OrderCommand),

    /// List reservations
    List(ListCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
