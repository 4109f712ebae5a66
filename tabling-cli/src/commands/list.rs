//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV).

use crate::commands::table_id;
use crate::error::CliError;
use crate::output::{render, Row};
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabling::config::OutputFormat;
use tabling::{Database, Reservation, ReservationStatus};

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Only reservations in these statuses (repeatable; default: pending,
    /// confirmed and seated)
    #[arg(long, value_name = "STATUS")]
    pub status: Vec<ReservationStatus>,

    /// Include completed, cancelled and no-show reservations
    #[arg(long, conflicts_with = "status")]
    pub all: bool,

    /// Only reservations occupying this table
    #[arg(long, value_name = "N")]
    pub table: Option<u32>,

    /// Output format: table, json, csv or tsv
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

/// A reservation as listed.
#[derive(Serialize)]
pub struct ReservationRow {
    id: i64,
    tables: Vec<u32>,
    party: u16,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    guest: String,
    phone: Option<String>,
    status: ReservationStatus,
}

impl From<&Reservation> for ReservationRow {
    fn from(reservation: &Reservation) -> Self {
        let window = reservation.window();
        Self {
            id: reservation.id().value(),
            tables: reservation
                .effective_tables()
                .iter()
                .map(|t| t.value())
                .collect(),
            party: reservation.party_size(),
            starts_at: window.starts_at(),
            ends_at: window.ends_at(),
            guest: reservation.guest_name().to_string(),
            phone: reservation.phone().map(str::to_string),
            status: reservation.status(),
        }
    }
}

impl Row for ReservationRow {
    const HEADERS: &'static [&'static str] = &[
        "id", "tables", "party", "starts_at", "ends_at", "guest", "phone", "status",
    ];

    fn fields(&self) -> Vec<String> {
        let tables = self
            .tables
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("+");
        vec![
            self.id.to_string(),
            tables,
            self.party.to_string(),
            format_timestamp(self.starts_at),
            format_timestamp(self.ends_at),
            self.guest.clone(),
            self.phone.clone().unwrap_or_default(),
            self.status.to_string(),
        ]
    }
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let table = self.table.map(table_id).transpose()?;
        let statuses: Vec<ReservationStatus> = if self.all {
            Vec::new()
        } else if self.status.is_empty() {
            ReservationStatus::ALL
                .into_iter()
                .filter(|s| s.is_active())
                .collect()
        } else {
            self.status
        };

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let reservations = match table {
            Some(table) => Database::reservations_on_table(db.connection(), table, &statuses)?,
            None => Database::list_reservations(db.connection(), &statuses)?,
        };

        let rows: Vec<ReservationRow> = reservations.iter().map(ReservationRow::from).collect();
        let format = self.format.or(config.output_format).unwrap_or_default();
        render(&rows, format)
    }
}
