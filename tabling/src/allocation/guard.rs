//! Competing-claim checks for physical tables.
//!
//! All queries run against the caller's transaction, so under
//! `BEGIN IMMEDIATE` they see a state no other terminal can change before
//! the caller commits.

use std::fmt;

use chrono::Duration;
use rusqlite::Connection;

use crate::database::Database;
use crate::error::Result;
use crate::order::{OrderId, OrderStatus};
use crate::reservation::{Reservation, ReservationId, ReservationStatus, VisitWindow};
use crate::table::{TableId, TableStatus};

/// Statuses whose windows block new bookings.
const BOOKING_BLOCKERS: [ReservationStatus; 3] = [
    ReservationStatus::Pending,
    ReservationStatus::Confirmed,
    ReservationStatus::Seated,
];

/// Why a table cannot be marked occupied for a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatingConflict {
    /// The table is not on the floor plan.
    MissingTable,
    /// Another reservation is already seated there.
    SeatedReservation(ReservationId),
    /// An order is still open or pending there.
    ActiveOrder(OrderId),
    /// The table is occupied without any recorded claim.
    WalkIn,
}

impl fmt::Display for SeatingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTable => write!(f, "table does not exist"),
            Self::SeatedReservation(id) => write!(f, "reservation {id} is seated there"),
            Self::ActiveOrder(id) => write!(f, "order {id} is still active"),
            Self::WalkIn => write!(f, "occupied by walk-in guests"),
        }
    }
}

/// Read-only claim checks against the current transaction.
#[derive(Debug, Clone, Copy)]
pub struct AllocationGuard<'a> {
    conn: &'a Connection,
}

impl<'a> AllocationGuard<'a> {
    /// Creates a guard over a connection or open transaction.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &'a Connection {
        self.conn
    }

    /// True if a reservation other than `exclude` is seated on `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_competing_seated_reservation(
        &self,
        table: TableId,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        Ok(self.seated_elsewhere(table, exclude)?.is_some())
    }

    /// True if any order on `table` is `open` or `pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_active_order(&self, table: TableId) -> Result<bool> {
        Ok(self.first_active_order(table)?.is_some())
    }

    /// True if a reservation other than `exclude` is `confirmed` or `seated`
    /// on `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_active_reservation_claim(
        &self,
        table: TableId,
        exclude: Option<ReservationId>,
    ) -> Result<bool> {
        let claims = Database::reservations_on_table(
            self.conn,
            table,
            &[ReservationStatus::Confirmed, ReservationStatus::Seated],
        )?;
        Ok(claims.iter().any(|r| Some(r.id()) != exclude))
    }

    /// Checks whether `reservation` may occupy `table`.
    ///
    /// Precedence: missing table, another seated reservation, an active
    /// order, walk-in occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn seating_conflict(
        &self,
        table: TableId,
        reservation: ReservationId,
    ) -> Result<Option<SeatingConflict>> {
        let Some(record) = Database::get_table(self.conn, table)? else {
            return Ok(Some(SeatingConflict::MissingTable));
        };
        if let Some(other) = self.seated_elsewhere(table, Some(reservation))? {
            return Ok(Some(SeatingConflict::SeatedReservation(other)));
        }
        if let Some(order) = self.first_active_order(table)? {
            return Ok(Some(SeatingConflict::ActiveOrder(order)));
        }
        if record.status() == TableStatus::Occupied {
            return Ok(Some(SeatingConflict::WalkIn));
        }
        Ok(None)
    }

    /// Active reservations on `table` whose window overlaps `window` once
    /// each visit is followed by `turnover`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn overlapping_reservations(
        &self,
        table: TableId,
        window: &VisitWindow,
        turnover: Duration,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>> {
        let candidates = Database::reservations_on_table(self.conn, table, &BOOKING_BLOCKERS)?;
        Ok(candidates
            .into_iter()
            .filter(|r| Some(r.id()) != exclude)
            .filter(|r| r.window().overlaps(window, turnover))
            .collect())
    }

    fn seated_elsewhere(
        &self,
        table: TableId,
        exclude: Option<ReservationId>,
    ) -> Result<Option<ReservationId>> {
        let seated =
            Database::reservations_on_table(self.conn, table, &[ReservationStatus::Seated])?;
        Ok(seated
            .iter()
            .map(Reservation::id)
            .find(|id| Some(*id) != exclude))
    }

    fn first_active_order(&self, table: TableId) -> Result<Option<OrderId>> {
        let orders = Database::orders_on_table(self.conn, table, &OrderStatus::ACTIVE)?;
        Ok(orders.first().map(crate::order::Order::id))
    }
}
