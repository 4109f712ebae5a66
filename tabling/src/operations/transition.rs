//! Reservation lifecycle transitions and their table effects.

use rusqlite::Connection;

use crate::allocation::{AllocationGuard, ReleasePolicy, SeatingConflict};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::table::{TableId, TableStatus};

use super::plan::{OperationPlan, PlanAction};

/// What a transition does to the reservation's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEffect {
    /// Mark free tables `reserved`.
    Reserve,
    /// Mark tables `occupied` after the seating check.
    Occupy,
    /// Run the release coordinator.
    Release(ReleasePolicy),
    /// Leave tables alone.
    Nothing,
}

/// Table effect of moving a reservation from `from` to `to`.
///
/// Invalid transitions map to [`TableEffect::Nothing`].
///
/// # Examples
///
/// ```
/// use tabling::allocation::ReleasePolicy;
/// use tabling::operations::{table_effect, TableEffect};
/// use tabling::ReservationStatus::*;
///
/// assert_eq!(table_effect(Confirmed, Seated), TableEffect::Occupy);
/// assert_eq!(
///     table_effect(Seated, Cancelled),
///     TableEffect::Release(ReleasePolicy::FreeIfPossible)
/// );
/// assert_eq!(
///     table_effect(Confirmed, Cancelled),
///     TableEffect::Release(ReleasePolicy::FreeIfNoActiveReservations)
/// );
/// ```
#[must_use]
pub const fn table_effect(from: ReservationStatus, to: ReservationStatus) -> TableEffect {
    use ReservationStatus::{Cancelled, Completed, Confirmed, NoShow, Pending, Seated};

    match (from, to) {
        (Pending, Confirmed) => TableEffect::Reserve,
        (Confirmed, Seated) => TableEffect::Occupy,
        (Seated, Completed | Cancelled | NoShow) => {
            TableEffect::Release(ReleasePolicy::FreeIfPossible)
        }
        (Pending | Confirmed, Cancelled | NoShow) => {
            TableEffect::Release(ReleasePolicy::FreeIfNoActiveReservations)
        }
        _ => TableEffect::Nothing,
    }
}

/// Options for a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOptions {
    /// The reservation to move.
    pub reservation: ReservationId,
    /// The requested status.
    pub target: ReservationStatus,
    /// Seat even when a table is claimed; conflicts become warnings.
    pub force: bool,
}

impl TransitionOptions {
    /// Creates options for moving `reservation` to `target`.
    #[must_use]
    pub const fn new(reservation: ReservationId, target: ReservationStatus) -> Self {
        Self {
            reservation,
            target,
            force: false,
        }
    }

    /// Sets the force flag.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Plans a confirm, seat, complete, cancel or no-show.
///
/// # Examples
///
/// ```no_run
/// use tabling::operations::{PlanExecutor, TransitionOptions, TransitionPlan};
/// use tabling::{Database, DatabaseConfig, ReservationId, ReservationStatus};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tabling.db")).unwrap();
/// let id = ReservationId::try_from(4).unwrap();
///
/// let tx = db.begin_transaction().unwrap();
/// let options = TransitionOptions::new(id, ReservationStatus::Seated);
/// let plan = TransitionPlan::new(options).build_plan(&tx).unwrap();
/// PlanExecutor::new(&tx).execute(&plan).unwrap();
/// tx.commit().unwrap();
/// ```
pub struct TransitionPlan {
    options: TransitionOptions,
}

impl TransitionPlan {
    /// Creates a planner.
    #[must_use]
    pub const fn new(options: TransitionOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation does not exist
    /// - [`Error::InvalidTransition`] if the lifecycle forbids the move
    /// - [`Error::TableUnavailable`] if seating meets a conflict without `force`
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let id = self.options.reservation;
        let target = self.options.target;

        let reservation =
            Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
                resource: format!("reservation {id}"),
            })?;
        let from = reservation.status();
        from.transition_to(target)?;

        let plan = OperationPlan::new(format!(
            "Move reservation {id} ({}) from {from} to {target}",
            reservation.guest_name()
        ))
        .add_action(PlanAction::SetReservationStatus {
            id,
            from,
            to: target,
        });

        match table_effect(from, target) {
            TableEffect::Reserve => Self::plan_reserve(conn, &reservation, plan),
            TableEffect::Occupy => self.plan_occupy(conn, &reservation, plan),
            TableEffect::Release(policy) => Ok(plan.add_action(PlanAction::ReleaseTables {
                tables: reservation.effective_tables().into(),
                policy,
                exclude: Some(id),
            })),
            TableEffect::Nothing => Ok(plan),
        }
    }

    fn plan_reserve(
        conn: &Connection,
        reservation: &Reservation,
        mut plan: OperationPlan,
    ) -> Result<OperationPlan> {
        let mut free = Vec::new();
        for table in reservation.effective_tables().iter() {
            match Database::get_table(conn, table)? {
                None => {
                    plan = plan.add_warning(format!("table {table} no longer exists"));
                }
                Some(record) if record.status() == TableStatus::Free => free.push(table),
                Some(record) if record.status() == TableStatus::Occupied => {
                    plan = plan.add_warning(format!(
                        "table {table} is occupied; it will not be held"
                    ));
                }
                Some(_) => {}
            }
        }

        if !free.is_empty() {
            plan = plan.add_action(PlanAction::SetTableStatus {
                tables: free,
                status: TableStatus::Reserved,
            });
        }
        Ok(plan)
    }

    fn plan_occupy(
        &self,
        conn: &Connection,
        reservation: &Reservation,
        mut plan: OperationPlan,
    ) -> Result<OperationPlan> {
        let guard = AllocationGuard::new(conn);
        let mut seats: Vec<TableId> = Vec::new();

        for table in reservation.effective_tables().iter() {
            let Some(conflict) = guard.seating_conflict(table, reservation.id())? else {
                seats.push(table);
                continue;
            };
            if !self.options.force {
                return Err(Error::TableUnavailable {
                    table,
                    reason: conflict.to_string(),
                });
            }
            plan = plan.add_warning(format!("table {table}: {conflict} (forced)"));
            if conflict != SeatingConflict::MissingTable {
                seats.push(table);
            }
        }

        if !seats.is_empty() {
            plan = plan.add_action(PlanAction::SetTableStatus {
                tables: seats,
                status: TableStatus::Occupied,
            });
        }
        Ok(plan)
    }
}
