//! Per-table release under the two release policies.
//!
//! Each table of a set is decided on its own, so a combined booking may be
//! released partially: one table goes back to `free` while another stays
//! held by an unrelated claim.

use std::fmt;

use rusqlite::Connection;
use serde::Serialize;

use crate::database::Database;
use crate::error::Result;
use crate::reservation::ReservationId;
use crate::table::{TableId, TableStatus};

use super::guard::AllocationGuard;

/// How to decide whether a table may return to `free`.
///
/// After a visit the only blockers are guests physically at the table.
/// After a cancellation any confirmed booking keeps the table held, and
/// walk-ins are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Used when a visit ends (seated reservation leaves, order closes).
    ///
    /// Frees the table unless another reservation is seated there or an
    /// order is still active.
    FreeIfPossible,
    /// Used when a reservation is cancelled or missed before seating.
    ///
    /// Leaves `occupied` tables alone, and frees the rest unless another
    /// reservation is `confirmed` or `seated` there.
    FreeIfNoActiveReservations,
}

impl fmt::Display for ReleasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeIfPossible => write!(f, "free-if-possible"),
            Self::FreeIfNoActiveReservations => write!(f, "free-if-no-active-reservations"),
        }
    }
}

/// The claim that kept a table from being freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// Another reservation is seated there.
    SeatedReservation,
    /// An order is open or pending there.
    ActiveOrder,
    /// Another reservation is confirmed or seated there.
    ActiveReservation,
}

/// What happened to one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "claim")]
pub enum ReleaseOutcome {
    /// Set to `free`.
    Freed,
    /// Was already `free`; nothing written.
    AlreadyFree,
    /// Not on the floor plan; skipped.
    Missing,
    /// Left `occupied` for walk-in guests.
    WalkInOccupied,
    /// Kept by a competing claim.
    Claimed(ClaimKind),
}

impl ReleaseOutcome {
    /// True if the table is `free` after the release.
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Freed | Self::AlreadyFree)
    }
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Freed => write!(f, "freed"),
            Self::AlreadyFree => write!(f, "already free"),
            Self::Missing => write!(f, "missing, skipped"),
            Self::WalkInOccupied => write!(f, "kept for walk-in"),
            Self::Claimed(ClaimKind::SeatedReservation) => {
                write!(f, "kept, another reservation is seated")
            }
            Self::Claimed(ClaimKind::ActiveOrder) => write!(f, "kept, an order is active"),
            Self::Claimed(ClaimKind::ActiveReservation) => {
                write!(f, "kept, another reservation holds it")
            }
        }
    }
}

/// Release outcome for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableRelease {
    /// The table.
    pub table: TableId,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: ReleaseOutcome,
}

/// Applies a [`ReleasePolicy`] to a set of tables.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tabling::allocation::{ReleaseCoordinator, ReleaseOutcome, ReleasePolicy};
/// use tabling::database::{initialize_schema, Database};
/// use tabling::{Table, TableId, TableStatus};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
///
/// let five = TableId::try_from(5_u32).unwrap();
/// Database::insert_table(&conn, &Table::new(five, "T5", 4).unwrap()).unwrap();
/// Database::update_table_status(&conn, five, TableStatus::Occupied).unwrap();
///
/// let releases = ReleaseCoordinator::new(&conn)
///     .release(&[five], ReleasePolicy::FreeIfPossible, None)
///     .unwrap();
/// assert_eq!(releases[0].outcome, ReleaseOutcome::Freed);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReleaseCoordinator<'a> {
    guard: AllocationGuard<'a>,
}

impl<'a> ReleaseCoordinator<'a> {
    /// Creates a coordinator over a connection or open transaction.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            guard: AllocationGuard::new(conn),
        }
    }

    /// Releases each table under `policy`, writing `free` where allowed.
    ///
    /// `exclude` is the reservation being closed; it never counts as a
    /// competing claim on its own tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or update fails. Tables processed before
    /// the failure have been written through the caller's transaction.
    pub fn release(
        &self,
        tables: &[TableId],
        policy: ReleasePolicy,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<TableRelease>> {
        let mut releases = Vec::with_capacity(tables.len());
        for &table in tables {
            let outcome = self.decide(table, policy, exclude)?;
            if outcome == ReleaseOutcome::Freed {
                Database::update_table_status(self.guard.connection(), table, TableStatus::Free)?;
                log::info!("table {table} freed ({policy})");
            } else {
                log::debug!("table {table}: {outcome} ({policy})");
            }
            releases.push(TableRelease { table, outcome });
        }
        Ok(releases)
    }

    /// Computes the outcomes [`release`](Self::release) would produce without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn preview(
        &self,
        tables: &[TableId],
        policy: ReleasePolicy,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<TableRelease>> {
        tables
            .iter()
            .map(|&table| {
                self.decide(table, policy, exclude)
                    .map(|outcome| TableRelease { table, outcome })
            })
            .collect()
    }

    fn decide(
        &self,
        table: TableId,
        policy: ReleasePolicy,
        exclude: Option<ReservationId>,
    ) -> Result<ReleaseOutcome> {
        let Some(record) = Database::get_table(self.guard.connection(), table)? else {
            return Ok(ReleaseOutcome::Missing);
        };

        match policy {
            ReleasePolicy::FreeIfPossible => {
                if record.status().is_free() {
                    Ok(ReleaseOutcome::AlreadyFree)
                } else if self.guard.has_competing_seated_reservation(table, exclude)? {
                    Ok(ReleaseOutcome::Claimed(ClaimKind::SeatedReservation))
                } else if self.guard.has_active_order(table)? {
                    Ok(ReleaseOutcome::Claimed(ClaimKind::ActiveOrder))
                } else {
                    Ok(ReleaseOutcome::Freed)
                }
            }
            ReleasePolicy::FreeIfNoActiveReservations => match record.status() {
                TableStatus::Occupied => Ok(ReleaseOutcome::WalkInOccupied),
                TableStatus::Free => Ok(ReleaseOutcome::AlreadyFree),
                TableStatus::Reserved => {
                    if self.guard.has_active_reservation_claim(table, exclude)? {
                        Ok(ReleaseOutcome::Claimed(ClaimKind::ActiveReservation))
                    } else {
                        Ok(ReleaseOutcome::Freed)
                    }
                }
            },
        }
    }
}
