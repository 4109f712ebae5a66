//! Order commands.
//!
//! Orders are the POS side of table occupancy: opening one occupies the
//! table, closing the last one hands it back for release.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::commands::table_id;
use crate::error::CliError;
use crate::output::{render, Row};
use crate::utils::{
    format_timestamp, load_configuration, open_database, run_plan, GlobalOptions,
};
use chrono::{DateTime, Utc};
use tabling::config::OutputFormat;
use tabling::operations::{CloseOrderPlan, OpenOrderPlan};
use tabling::{Database, Order, OrderId, OrderStatus};

/// Open, close and list orders.
#[derive(Subcommand)]
pub enum OrderCommand {
    /// Open an order on a table (seats walk-in guests)
    Open(OpenOrder),
    /// Close an order and release its table if nothing else claims it
    Close(CloseOrder),
    /// List orders
    List(ListOrders),
}

impl OrderCommand {
    /// Execute the selected order command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            OrderCommand::Open(cmd) => cmd.execute(global),
            OrderCommand::Close(cmd) => cmd.execute(global),
            OrderCommand::List(cmd) => cmd.execute(global),
        }
    }
}

/// Open an order on a table.
#[derive(Args)]
pub struct OpenOrder {
    /// Table number
    #[arg(long, value_name = "N")]
    pub table: u32,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl OpenOrder {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let table = table_id(self.table)?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let tx = db.begin_transaction()?;
        let plan = OpenOrderPlan::new(table).build_plan(&tx)?;
        let result = run_plan(tx, &plan, self.dry_run, global)?;

        if let Some(order) = result.created_order {
            println!("{}", order.id());
        }
        Ok(())
    }
}

/// How an order is closed.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ClosingStatus {
    /// Settled
    Paid,
    /// Closed without a payment record
    Closed,
    /// Voided
    Voided,
}

impl From<ClosingStatus> for OrderStatus {
    fn from(status: ClosingStatus) -> Self {
        match status {
            ClosingStatus::Paid => OrderStatus::Paid,
            ClosingStatus::Closed => OrderStatus::Closed,
            ClosingStatus::Voided => OrderStatus::Voided,
        }
    }
}

/// Close an order.
#[derive(Args)]
pub struct CloseOrder {
    /// Order id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Final order status
    #[arg(long = "as", value_enum, default_value = "paid")]
    pub status: ClosingStatus,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl CloseOrder {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let id =
            OrderId::try_from(self.id).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let tx = db.begin_transaction()?;
        let plan = CloseOrderPlan::new(id, self.status.into()).build_plan(&tx)?;
        let result = run_plan(tx, &plan, self.dry_run, global)?;

        if !self.dry_run && !global.quiet {
            for release in &result.releases {
                eprintln!("Table {}: {}", release.table, release.outcome);
            }
        }
        Ok(())
    }
}

/// An order as listed.
#[derive(Serialize)]
pub struct OrderRow {
    id: i64,
    table: u32,
    status: OrderStatus,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().value(),
            table: order.table().value(),
            status: order.status(),
            opened_at: order.opened_at(),
            closed_at: order.closed_at(),
        }
    }
}

impl Row for OrderRow {
    const HEADERS: &'static [&'static str] = &["id", "table", "status", "opened_at", "closed_at"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.table.to_string(),
            self.status.to_string(),
            format_timestamp(self.opened_at),
            self.closed_at.map(format_timestamp).unwrap_or_default(),
        ]
    }
}

/// List orders.
#[derive(Args)]
pub struct ListOrders {
    /// Include paid, closed and voided orders
    #[arg(long)]
    pub all: bool,

    /// Only orders on this table
    #[arg(long, value_name = "N")]
    pub table: Option<u32>,

    /// Output format: table, json, csv or tsv
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

impl ListOrders {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let table = self.table.map(table_id).transpose()?;
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let statuses: &[OrderStatus] = if self.all { &[] } else { &OrderStatus::ACTIVE };
        let mut orders = Database::list_orders(db.connection(), statuses)?;
        if let Some(table) = table {
            orders.retain(|o| o.table() == table);
        }

        let rows: Vec<OrderRow> = orders.iter().map(OrderRow::from).collect();
        let format = self.format.or(config.output_format).unwrap_or_default();
        render(&rows, format)
    }
}
