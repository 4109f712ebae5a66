//! Floor plan commands.
//!
//! `table add/remove` edit single tables, `table import` seeds every table
//! listed under `floor_plan` in the venue configuration.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::commands::table_id;
use crate::error::CliError;
use crate::output::{render, Row};
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use tabling::allocation::AllocationGuard;
use tabling::config::OutputFormat;
use tabling::{Database, OrderStatus, ReservationStatus, Table, TableStatus};

/// Manage the floor plan.
#[derive(Subcommand)]
pub enum TableCommand {
    /// Add a table
    Add(AddTable),
    /// List every table with its status
    List(ListTables),
    /// Show one table with its reservations and orders
    Show(ShowTable),
    /// Remove a table from the floor plan
    Remove(RemoveTable),
    /// Add the tables configured under `floor_plan`
    Import(ImportTables),
}

impl TableCommand {
    /// Execute the selected table command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            TableCommand::Add(cmd) => cmd.execute(global),
            TableCommand::List(cmd) => cmd.execute(global),
            TableCommand::Show(cmd) => cmd.execute(global),
            TableCommand::Remove(cmd) => cmd.execute(global),
            TableCommand::Import(cmd) => cmd.execute(global),
        }
    }
}

/// A table as listed.
#[derive(Serialize)]
pub struct TableRow {
    id: u32,
    name: String,
    zone: String,
    capacity: u16,
    status: TableStatus,
}

impl From<&Table> for TableRow {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id().value(),
            name: table.name().to_string(),
            zone: table.zone().to_string(),
            capacity: table.capacity(),
            status: table.status(),
        }
    }
}

impl Row for TableRow {
    const HEADERS: &'static [&'static str] = &["id", "name", "zone", "capacity", "status"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.zone.clone(),
            self.capacity.to_string(),
            self.status.to_string(),
        ]
    }
}

/// Add a table.
#[derive(Args)]
pub struct AddTable {
    /// Table number
    #[arg(long, value_name = "N")]
    pub id: u32,

    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Number of seats
    #[arg(long, value_name = "SEATS")]
    pub capacity: u16,

    /// Floor zone (e.g. terrace, bar)
    #[arg(long, value_name = "ZONE")]
    pub zone: Option<String>,
}

impl AddTable {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut table = Table::new(table_id(self.id)?, self.name, self.capacity)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        if let Some(zone) = self.zone {
            table = table
                .in_zone(zone)
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let tx = db.begin_transaction()?;
        if Database::get_table(&tx, table.id())?.is_some() {
            return Err(CliError::SemanticFailure(format!(
                "table {} already exists",
                table.id()
            )));
        }
        Database::insert_table(&tx, &table)?;
        tx.commit().map_err(tabling::Error::from)?;

        if !global.quiet {
            eprintln!("Added table {} ({})", table.id(), table.name());
        }
        Ok(())
    }
}

/// List every table with its status.
#[derive(Args)]
pub struct ListTables {
    /// Output format: table, json, csv or tsv
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Only tables in this zone
    #[arg(long, value_name = "ZONE")]
    pub zone: Option<String>,
}

impl ListTables {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let mut tables = Database::list_tables(db.connection())?;
        if let Some(ref zone) = self.zone {
            tables.retain(|t| t.zone() == zone);
        }

        let rows: Vec<TableRow> = tables.iter().map(TableRow::from).collect();
        let format = self.format.or(config.output_format).unwrap_or_default();
        render(&rows, format)
    }
}

/// Show one table with its reservations and orders.
#[derive(Args)]
pub struct ShowTable {
    /// Table number
    #[arg(value_name = "ID")]
    pub id: u32,
}

impl ShowTable {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let id = table_id(self.id)?;
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let conn = db.connection();

        let table = Database::get_table(conn, id)?.ok_or_else(|| tabling::Error::NotFound {
            resource: format!("table {id}"),
        })?;

        println!("Table {}: {}", table.id(), table.name());
        println!("  zone:     {}", table.zone());
        println!("  capacity: {}", table.capacity());
        println!("  status:   {}", table.status());

        let active: Vec<ReservationStatus> = ReservationStatus::ALL
            .into_iter()
            .filter(|s| s.is_active())
            .collect();
        let reservations = Database::reservations_on_table(conn, id, &active)?;
        if !reservations.is_empty() {
            println!("  reservations:");
            for r in &reservations {
                println!(
                    "    #{} {} {} party of {} on {} ({})",
                    r.id(),
                    format_timestamp(r.window().starts_at()),
                    r.guest_name(),
                    r.party_size(),
                    r.effective_tables(),
                    r.status()
                );
            }
        }

        let orders = Database::orders_on_table(conn, id, &OrderStatus::ACTIVE)?;
        if !orders.is_empty() {
            println!("  orders:");
            for o in &orders {
                println!(
                    "    #{} {} since {}",
                    o.id(),
                    o.status(),
                    format_timestamp(o.opened_at())
                );
            }
        }
        Ok(())
    }
}

/// Remove a table from the floor plan.
#[derive(Args)]
pub struct RemoveTable {
    /// Table number
    #[arg(value_name = "ID")]
    pub id: u32,

    /// Remove even if the table has an active order or a held reservation
    #[arg(long)]
    pub force: bool,
}

impl RemoveTable {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let id = table_id(self.id)?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let tx = db.begin_transaction()?;

        let guard = AllocationGuard::new(&tx);
        if !self.force {
            if guard.has_active_order(id)? {
                return Err(CliError::SemanticFailure(format!(
                    "table {id} has an active order (use --force to remove anyway)"
                )));
            }
            if guard.has_active_reservation_claim(id, None)? {
                return Err(CliError::SemanticFailure(format!(
                    "table {id} is held by a confirmed or seated reservation \
                     (use --force to remove anyway)"
                )));
            }
        }

        if !Database::delete_table(&tx, id)? {
            return Err(tabling::Error::NotFound {
                resource: format!("table {id}"),
            }
            .into());
        }
        tx.commit().map_err(tabling::Error::from)?;

        if !global.quiet {
            eprintln!("Removed table {id}");
        }
        Ok(())
    }
}

/// Add the tables configured under `floor_plan`.
#[derive(Args)]
pub struct ImportTables {
    /// Show which tables would be added
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportTables {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let definitions = config.floor_plan.clone().unwrap_or_default();
        if definitions.is_empty() {
            return Err(CliError::Config(
                "no floor_plan found in tabling.yaml or tabling.local.yaml".into(),
            ));
        }

        let tables = definitions
            .iter()
            .map(|d| d.to_table().map_err(|e| CliError::Config(e.to_string())))
            .collect::<Result<Vec<Table>, _>>()?;

        let mut db = open_database(global, &config)?;
        let mut missing = Vec::new();
        for table in tables {
            if Database::get_table(db.connection(), table.id())?.is_some() {
                if !global.quiet {
                    eprintln!("Skipping table {}: already on the floor", table.id());
                }
            } else {
                missing.push(table);
            }
        }

        if self.dry_run {
            if !global.quiet {
                eprintln!("Dry run - would add {} table(s)", missing.len());
            }
            for table in &missing {
                println!("{}\t{}", table.id(), table.name());
            }
            return Ok(());
        }

        let added = db.seed_tables(&missing)?;
        if !global.quiet {
            eprintln!("Imported {added} table(s)");
        }
        Ok(())
    }
}
