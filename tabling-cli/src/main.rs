//! Main entry point for the tabling CLI.
//!
//! Front-of-house commands for a restaurant floor shared by several
//! terminals:
//! - `book`: create a reservation on one or more combined tables
//! - `confirm`, `seat`, `complete`, `cancel`, `no-show`: move a reservation
//!   through its lifecycle
//! - `order`: open and close POS orders that occupy tables
//! - `table`: manage the floor plan
//! - `list`: show reservations

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use clap::Parser;
use cli::{Cli, Command};
use tabling::{Logger, ReservationStatus};
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let logger = tabling::init_logger(cli.verbose, cli.quiet);
    if Logger::install(logger.level()).is_err() {
        logger.warn("logger already installed");
    }

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Table(cmd) => cmd.execute(&global),
        Command::Book(cmd) => cmd.execute(&global),
        Command::Confirm(args) => args.execute(ReservationStatus::Confirmed, &global),
        Command::Seat(cmd) => cmd.execute(&global),
        Command::Complete(args) => args.execute(ReservationStatus::Completed, &global),
        Command::Cancel(args) => args.execute(ReservationStatus::Cancelled, &global),
        Command::NoShow(args) => args.execute(ReservationStatus::NoShow, &global),
        Command::Order(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Validate(cmd) => cmd.execute(&global),
        Command::ShowDataDir(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
