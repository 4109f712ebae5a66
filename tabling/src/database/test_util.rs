//! Shared test utilities for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use crate::binding::LinkedTables;
use crate::database::{Database, DatabaseConfig};
use crate::reservation::{Reservation, ReservationRequest, ReservationStatus, VisitWindow};
use crate::table::{Table, TableId};

/// Creates a temporary file-backed test database.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process
    std::mem::forget(dir);

    db
}

/// Shorthand for a valid table id.
///
/// # Panics
///
/// Panics on id 0.
#[must_use]
pub fn tid(value: u32) -> TableId {
    TableId::try_from(value).unwrap()
}

/// A free table named `T<id>`.
///
/// # Panics
///
/// Panics on id 0 or capacity 0.
#[must_use]
pub fn test_table(id: u32, capacity: u16) -> Table {
    Table::new(tid(id), format!("T{id}"), capacity).unwrap()
}

/// 2026-10-19 at the given hour, UTC.
///
/// # Panics
///
/// Panics on an invalid hour.
#[must_use]
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap()
}

/// A two-hour request starting at `hour`.
///
/// # Panics
///
/// Panics if the request is invalid.
#[must_use]
pub fn test_request(primary: u32, linked: &[u32], party: u16, hour: u32) -> ReservationRequest {
    ReservationRequest::builder(
        tid(primary),
        party,
        VisitWindow::starting_at(at(hour), 120).unwrap(),
    )
    .linked(LinkedTables::from_ids(linked.iter().map(|&id| tid(id))))
    .guest("Test Guest")
    .build()
    .unwrap()
}

/// Stores a reservation directly with the given status.
///
/// # Panics
///
/// Panics if the insert fails.
#[must_use]
pub fn insert_test_reservation(
    conn: &rusqlite::Connection,
    primary: u32,
    linked: &[u32],
    status: ReservationStatus,
) -> Reservation {
    let request = test_request(primary, linked, 2, 19);
    Database::insert_reservation(conn, &request, status, at(12)).unwrap()
}
