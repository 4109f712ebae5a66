//! Common test utilities for integration tests.
//!
//! Helpers for building a floor, booking guests and driving reservations
//! through the plan/execute pipeline the same way the CLI does.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use tabling::config::Config;
use tabling::operations::{
    BookOptions, BookPlan, CloseOrderPlan, ExecutionResult, OpenOrderPlan, PlanExecutor,
    TransitionOptions, TransitionPlan,
};
use tabling::{
    Database, DatabaseConfig, LinkedTables, Order, OrderId, OrderStatus, Reservation,
    ReservationId, ReservationStatus, Result, Table, TableId, TableStatus,
};

/// Creates a database file in a temporary directory.
///
/// The directory is leaked so the file outlives the helper.
#[allow(dead_code)]
pub fn create_test_database_path() -> PathBuf {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("test.db");
    std::mem::forget(temp_dir);
    db_path
}

/// Opens a fresh database holding tables `1..=count`, four seats each.
#[allow(dead_code)]
pub fn create_floor(count: u32) -> Database {
    let mut db = Database::open(DatabaseConfig::new(create_test_database_path())).unwrap();
    let tables: Vec<Table> = (1..=count).map(|id| table(id, 4)).collect();
    db.seed_tables(&tables).unwrap();
    db
}

/// Shorthand for a valid table id.
#[allow(dead_code)]
pub fn tid(value: u32) -> TableId {
    TableId::try_from(value).unwrap()
}

/// A free table named `T<id>`.
#[allow(dead_code)]
pub fn table(id: u32, capacity: u16) -> Table {
    Table::new(tid(id), format!("T{id}"), capacity).unwrap()
}

/// 2026-10-19 at the given hour, UTC.
#[allow(dead_code)]
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap()
}

/// Books a party of two at `hour` for the default visit length.
#[allow(dead_code)]
pub fn book(db: &mut Database, primary: u32, linked: &[u32], hour: u32) -> Result<Reservation> {
    book_party(db, primary, linked, 2, hour)
}

/// Books a party of `party` at `hour` for the default visit length.
#[allow(dead_code)]
pub fn book_party(
    db: &mut Database,
    primary: u32,
    linked: &[u32],
    party: u16,
    hour: u32,
) -> Result<Reservation> {
    let config = Config::default();
    let options = BookOptions::new(tid(primary), party, at(hour), "Integration Guest")
        .with_linked(LinkedTables::from_ids(linked.iter().map(|&id| tid(id))));

    let tx = db.begin_transaction()?;
    let plan = BookPlan::new(options, &config).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).at(at(12)).execute(&plan)?;
    tx.commit()?;

    Ok(result
        .created_reservation
        .expect("booking creates a reservation"))
}

/// Moves a reservation to `target` and commits.
#[allow(dead_code)]
pub fn transition(
    db: &mut Database,
    id: ReservationId,
    target: ReservationStatus,
) -> Result<ExecutionResult> {
    let tx = db.begin_transaction()?;
    let plan = TransitionPlan::new(TransitionOptions::new(id, target)).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(result)
}

/// Books a reservation and walks it to `status` through the lifecycle.
#[allow(dead_code)]
pub fn booked_as(
    db: &mut Database,
    primary: u32,
    linked: &[u32],
    hour: u32,
    status: ReservationStatus,
) -> Reservation {
    let reservation = book(db, primary, linked, hour).unwrap();
    let path: &[ReservationStatus] = match status {
        ReservationStatus::Pending => &[],
        ReservationStatus::Confirmed => &[ReservationStatus::Confirmed],
        ReservationStatus::Seated => &[ReservationStatus::Confirmed, ReservationStatus::Seated],
        other => &[ReservationStatus::Confirmed, ReservationStatus::Seated, other],
    };
    for &step in path {
        transition(db, reservation.id(), step).unwrap();
    }
    reservation
}

/// Opens an order on `table` and commits.
#[allow(dead_code)]
pub fn open_order(db: &mut Database, table: u32) -> Result<Order> {
    let tx = db.begin_transaction()?;
    let plan = OpenOrderPlan::new(tid(table)).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(result.created_order.expect("opening creates an order"))
}

/// Closes an order as `status` and commits.
#[allow(dead_code)]
pub fn close_order(db: &mut Database, id: OrderId, status: OrderStatus) -> Result<ExecutionResult> {
    let tx = db.begin_transaction()?;
    let plan = CloseOrderPlan::new(id, status).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(result)
}

/// Current status of a table.
#[allow(dead_code)]
pub fn status_of(db: &Database, table: u32) -> TableStatus {
    Database::get_table(db.connection(), tid(table))
        .unwrap()
        .unwrap()
        .status()
}

/// Current status of a reservation.
#[allow(dead_code)]
pub fn reservation_status(db: &Database, id: ReservationId) -> ReservationStatus {
    Database::get_reservation(db.connection(), id)
        .unwrap()
        .unwrap()
        .status()
}
