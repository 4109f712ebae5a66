//! Store operations for tables, reservations, and orders.
//!
//! Every function takes a `&Connection` so it runs inside whatever
//! transaction the caller holds (a `rusqlite::Transaction` derefs to one).

use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::binding::LinkedTables;
use crate::error::{Error, Result};
use crate::order::{Order, OrderId, OrderStatus};
use crate::reservation::{
    Reservation, ReservationId, ReservationRequest, ReservationStatus, VisitWindow,
};
use crate::table::{Table, TableId, TableStatus};

use super::connection::Database;
use super::schema::{INSERT_RESERVATION, INSERT_TABLE, RESERVATION_COLUMNS, TOUCHES_TABLE_PREDICATE};

/// Converts Unix epoch seconds from the database into a timestamp.
fn unix_secs_to_datetime(secs: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Integer,
            format!("timestamp {secs} is out of range").into(),
        )
    })
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Normalizes the untyped linked column.
fn decode_linked(value: ValueRef<'_>) -> LinkedTables {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(LinkedTables::from_json_str)
            .unwrap_or_default(),
        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) | ValueRef::Blob(_) => {
            LinkedTables::new()
        }
    }
}

fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<Table> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let zone: String = row.get(2)?;
    let capacity: u16 = row.get(3)?;
    let status: String = row.get(4)?;

    let id = TableId::try_from(id).map_err(|e| conversion_error(0, e))?;
    let status = status.parse::<TableStatus>().map_err(|e| conversion_error(4, e))?;

    Table::new(id, name, capacity)
        .and_then(|t| t.in_zone(zone))
        .map(|t| t.with_status(status))
        .map_err(|e| conversion_error(1, e))
}

/// Expects the columns of [`RESERVATION_COLUMNS`], in order.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let primary: i64 = row.get(1)?;
    let linked = decode_linked(row.get_ref(2)?);
    let party_size: u16 = row.get(3)?;
    let starts_at = unix_secs_to_datetime(row.get(4)?, 4)?;
    let ends_at = unix_secs_to_datetime(row.get(5)?, 5)?;
    let status: String = row.get(6)?;

    let window = VisitWindow::new(starts_at, ends_at).map_err(|e| conversion_error(5, e))?;

    Ok(Reservation {
        id: ReservationId::try_from(id).map_err(|e| conversion_error(0, e))?,
        primary_table: TableId::try_from(primary).map_err(|e| conversion_error(1, e))?,
        linked,
        party_size,
        window,
        status: status.parse().map_err(|e| conversion_error(6, e))?,
        guest_name: row.get(7)?,
        phone: row.get(8)?,
        notes: row.get(9)?,
        created_at: unix_secs_to_datetime(row.get(10)?, 10)?,
        updated_at: unix_secs_to_datetime(row.get(11)?, 11)?,
    })
}

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let id: i64 = row.get(0)?;
    let table: i64 = row.get(1)?;
    let status: String = row.get(2)?;
    let closed_at: Option<i64> = row.get(4)?;

    Ok(Order {
        id: OrderId::try_from(id).map_err(|e| conversion_error(0, e))?,
        table: TableId::try_from(table).map_err(|e| conversion_error(1, e))?,
        status: status.parse().map_err(|e| conversion_error(2, e))?,
        opened_at: unix_secs_to_datetime(row.get(3)?, 3)?,
        closed_at: closed_at
            .map(|secs| unix_secs_to_datetime(secs, 4))
            .transpose()?,
    })
}

/// `?start, ?start+1, ...` placeholders for an `IN` list.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

const SELECT_TABLE: &str = "SELECT id, name, zone, capacity, status FROM dining_tables WHERE id = ?";

const LIST_TABLES: &str = "SELECT id, name, zone, capacity, status FROM dining_tables ORDER BY id";

const UPDATE_TABLE_STATUS: &str = "UPDATE dining_tables SET status = ? WHERE id = ?";

const DELETE_TABLE: &str = "DELETE FROM dining_tables WHERE id = ?";

const UPDATE_RESERVATION_STATUS: &str =
    "UPDATE reservations SET status = ?, updated_at = ? WHERE id = ?";

const INSERT_ORDER: &str = "INSERT INTO orders (table_id, status, opened_at) VALUES (?, ?, ?)";

const ORDER_COLUMNS: &str = "id, table_id, status, opened_at, closed_at";

const UPDATE_ORDER_STATUS: &str = "UPDATE orders SET status = ?, closed_at = ? WHERE id = ?";

impl Database {
    /// Adds a table to the floor plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the id is already used, or any
    /// database error.
    pub fn insert_table(conn: &Connection, table: &Table) -> Result<()> {
        if Self::get_table(conn, table.id())?.is_some() {
            return Err(Error::Validation {
                field: "table_id".into(),
                message: format!("table {} already exists", table.id()),
            });
        }

        conn.execute(
            INSERT_TABLE,
            params![
                table.id().value(),
                table.name(),
                table.zone(),
                table.capacity(),
                table.status().as_str(),
            ],
        )?;
        Ok(())
    }

    /// Loads a table, `None` if it is not on the floor plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table(conn: &Connection, id: TableId) -> Result<Option<Table>> {
        Ok(conn
            .query_row(SELECT_TABLE, [id.value()], row_to_table)
            .optional()?)
    }

    /// Lists all tables ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(conn: &Connection) -> Result<Vec<Table>> {
        let mut stmt = conn.prepare(LIST_TABLES)?;
        let tables = stmt
            .query_map([], row_to_table)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Sets a table's status. Returns `false` if the table does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_table_status(conn: &Connection, id: TableId, status: TableStatus) -> Result<bool> {
        let rows = conn.execute(UPDATE_TABLE_STATUS, params![status.as_str(), id.value()])?;
        Ok(rows > 0)
    }

    /// Removes a table from the floor plan. Returns `false` if it did not exist.
    ///
    /// Reservations and orders referencing it are kept; releases skip it.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_table(conn: &Connection, id: TableId) -> Result<bool> {
        let rows = conn.execute(DELETE_TABLE, [id.value()])?;
        Ok(rows > 0)
    }

    /// Stores a reservation and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_reservation(
        conn: &Connection,
        request: &ReservationRequest,
        status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Reservation> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                request.primary_table().value(),
                request.linked_tables().to_json(),
                request.party_size(),
                request.window().starts_at().timestamp(),
                request.window().ends_at().timestamp(),
                status.as_str(),
                request.guest_name(),
                request.phone(),
                request.notes(),
                now.timestamp(),
                now.timestamp(),
            ],
        )?;

        let id = ReservationId::try_from(conn.last_insert_rowid())?;
        Ok(Reservation::from_request(
            id,
            request.clone(),
            status,
            truncate_to_seconds(now),
        ))
    }

    /// Loads a reservation, `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        Ok(conn
            .query_row(&sql, [id.value()], row_to_reservation)
            .optional()?)
    }

    /// Lists reservations with any of `statuses` (all when empty), by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_reservations(
        conn: &Connection,
        statuses: &[ReservationStatus],
    ) -> Result<Vec<Reservation>> {
        let filter = if statuses.is_empty() {
            String::new()
        } else {
            format!("WHERE status IN ({})", placeholders(1, statuses.len()))
        };
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations {filter} ORDER BY starts_at, id"
        );

        let mut stmt = conn.prepare(&sql)?;
        let reservations = stmt
            .query_map(
                params_from_iter(statuses.iter().map(|s| s.as_str())),
                row_to_reservation,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Reservations whose effective table set contains `table`, restricted to
    /// `statuses` (all when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn reservations_on_table(
        conn: &Connection,
        table: TableId,
        statuses: &[ReservationStatus],
    ) -> Result<Vec<Reservation>> {
        let status_filter = if statuses.is_empty() {
            String::new()
        } else {
            format!("AND status IN ({})", placeholders(2, statuses.len()))
        };
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE {TOUCHES_TABLE_PREDICATE} {status_filter} ORDER BY starts_at, id"
        );

        let mut values: Vec<Value> = Vec::with_capacity(statuses.len() + 1);
        values.push(Value::Integer(i64::from(table.value())));
        values.extend(statuses.iter().map(|s| Value::Text(s.as_str().to_string())));

        let mut stmt = conn.prepare(&sql)?;
        let candidates = stmt
            .query_map(params_from_iter(values), row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(candidates
            .into_iter()
            .filter(|r| r.effective_tables().contains(table))
            .collect())
    }

    /// Sets a reservation's status. Returns `false` if the id is unknown.
    ///
    /// Only writes the status; lifecycle rules live in the operations layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_reservation_status(
        conn: &Connection,
        id: ReservationId,
        status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(
            UPDATE_RESERVATION_STATUS,
            params![status.as_str(), now.timestamp(), id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Opens an order on a table and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_order(conn: &Connection, table: TableId, now: DateTime<Utc>) -> Result<Order> {
        conn.execute(
            INSERT_ORDER,
            params![table.value(), OrderStatus::Open.as_str(), now.timestamp()],
        )?;

        Ok(Order {
            id: OrderId::try_from(conn.last_insert_rowid())?,
            table,
            status: OrderStatus::Open,
            opened_at: truncate_to_seconds(now),
            closed_at: None,
        })
    }

    /// Loads an order, `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_order(conn: &Connection, id: OrderId) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        Ok(conn.query_row(&sql, [id.value()], row_to_order).optional()?)
    }

    /// Lists orders with any of `statuses` (all when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders(conn: &Connection, statuses: &[OrderStatus]) -> Result<Vec<Order>> {
        let filter = if statuses.is_empty() {
            String::new()
        } else {
            format!("WHERE status IN ({})", placeholders(1, statuses.len()))
        };
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders {filter} ORDER BY id");

        let mut stmt = conn.prepare(&sql)?;
        let orders = stmt
            .query_map(
                params_from_iter(statuses.iter().map(|s| s.as_str())),
                row_to_order,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders)
    }

    /// Orders on `table` with any of `statuses` (all when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn orders_on_table(
        conn: &Connection,
        table: TableId,
        statuses: &[OrderStatus],
    ) -> Result<Vec<Order>> {
        let status_filter = if statuses.is_empty() {
            String::new()
        } else {
            format!("AND status IN ({})", placeholders(2, statuses.len()))
        };
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE table_id = ?1 {status_filter} ORDER BY id"
        );

        let mut values: Vec<Value> = Vec::with_capacity(statuses.len() + 1);
        values.push(Value::Integer(i64::from(table.value())));
        values.extend(statuses.iter().map(|s| Value::Text(s.as_str().to_string())));

        let mut stmt = conn.prepare(&sql)?;
        let orders = stmt
            .query_map(params_from_iter(values), row_to_order)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders)
    }

    /// Sets an order's status, stamping `closed_at` when it leaves the
    /// active statuses. Returns `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_order_status(
        conn: &Connection,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let closed_at = (!status.is_active()).then(|| now.timestamp());
        let rows = conn.execute(
            UPDATE_ORDER_STATUS,
            params![status.as_str(), closed_at, id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Verifies database integrity using `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(conn: &Connection) -> Result<()> {
        let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}

/// Drops sub-second precision so returned values match what is stored.
fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(time)
}
