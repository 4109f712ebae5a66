//! Book command implementation.
//!
//! This module implements the `book` command, which creates a pending
//! reservation on a table, optionally combined with linked tables.

use crate::commands::table_id;
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_datetime, run_plan, GlobalOptions};
use clap::Args;
use tabling::operations::{BookOptions, BookPlan};
use tabling::LinkedTables;

/// Book a table for a party.
#[derive(Args)]
pub struct BookCommand {
    /// Primary table number
    #[arg(long, value_name = "N")]
    pub table: u32,

    /// Additional table combined with the primary (repeatable)
    #[arg(long = "link", value_name = "N")]
    pub link: Vec<u32>,

    /// Party size
    #[arg(long, value_name = "GUESTS")]
    pub party: u16,

    /// Visit start, e.g. "2026-10-19 19:30" (local) or RFC 3339
    #[arg(long, value_name = "DATETIME")]
    pub at: String,

    /// Visit length in minutes (default: booking.default_visit_minutes)
    #[arg(long, value_name = "MINUTES")]
    pub minutes: Option<u32>,

    /// Guest name
    #[arg(long, value_name = "NAME")]
    pub guest: String,

    /// Contact phone number
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,

    /// Free-form notes (allergies, occasion, ...)
    #[arg(long, value_name = "TEXT")]
    pub notes: Option<String>,

    /// Check the booking without storing it
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    ///
    /// Prints the new reservation id to stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let primary = table_id(self.table)?;
        let linked = self
            .link
            .iter()
            .map(|&id| table_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        let starts_at = parse_datetime(&self.at)?;

        let mut options = BookOptions::new(primary, self.party, starts_at, self.guest)
            .with_linked(LinkedTables::from_ids(linked))
            .with_phone(self.phone)
            .with_notes(self.notes);
        if let Some(minutes) = self.minutes {
            options = options.with_minutes(minutes);
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let tx = db.begin_transaction()?;
        let plan = BookPlan::new(options, &config).build_plan(&tx)?;
        let result = run_plan(tx, &plan, self.dry_run, global)?;

        if let Some(reservation) = result.created_reservation {
            println!("{}", reservation.id());
            if global.verbose {
                eprintln!(
                    "Booked {} for {} on table {} at {}",
                    reservation.guest_name(),
                    reservation.party_size(),
                    reservation.effective_tables(),
                    reservation.window()
                );
            }
        }
        Ok(())
    }
}
