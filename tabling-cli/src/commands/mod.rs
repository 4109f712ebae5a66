//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database
//! - `table`: Manage the floor plan (add, list, show, remove, import)
//! - `book`: Book a table or combined tables
//! - `lifecycle`: Confirm, seat, complete, cancel and no-show
//! - `order`: Open, close and list orders
//! - `list`: List reservations
//! - `validate`: Validate a configuration file
//! - `show_data_dir`: Show the resolved data directory path
//! - `completions`: Generate shell completion scripts

pub mod book;
pub mod completions;
pub mod init;
pub mod lifecycle;
pub mod list;
pub mod order;
pub mod show_data_dir;
pub mod table;
pub mod validate;

pub use book::BookCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use lifecycle::{SeatCommand, TransitionArgs};
pub use list::ListCommand;
pub use order::OrderCommand;
pub use show_data_dir::ShowDataDirCommand;
pub use table::TableCommand;
pub use validate::ValidateCommand;

use crate::error::CliError;
use tabling::{ReservationId, TableId};

/// Converts a raw table number, rejecting 0.
pub(crate) fn table_id(value: u32) -> Result<TableId, CliError> {
    TableId::try_from(value).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Converts a raw reservation number, rejecting non-positive ids.
pub(crate) fn reservation_id(value: i64) -> Result<ReservationId, CliError> {
    ReservationId::try_from(value).map_err(|e| CliError::InvalidArguments(e.to_string()))
}
