//! Plan execution engine.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::allocation::{ReleaseCoordinator, TableRelease};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::order::Order;
use crate::reservation::Reservation;

use super::plan::{OperationPlan, PlanAction};

const DRY_RUN_SAVEPOINT: &str = "tabling_dry_run";

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether this was a dry run (nothing persisted).
    pub dry_run: bool,

    /// Descriptions of the actions taken, or that would be taken.
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The stored reservation, for booking plans. `None` on dry runs.
    pub created_reservation: Option<Reservation>,

    /// The opened order, for order plans. `None` on dry runs.
    pub created_order: Option<Order>,

    /// One outcome per released table, previewed on dry runs.
    pub releases: Vec<TableRelease>,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            created_reservation: None,
            created_order: None,
            releases: Vec::new(),
        }
    }
}

/// Applies operation plans to the database.
///
/// Every action runs on the connection the plan was built on, normally a
/// transaction from [`Database::begin_transaction`]; the caller commits.
///
/// In dry-run mode the actions run inside a savepoint that is always rolled
/// back. Releases are only previewed, so later steps still see the effects
/// of earlier ones and the reported outcomes match a real run.
///
/// # Examples
///
/// ```
/// use tabling::operations::{OpenOrderPlan, PlanExecutor};
/// use tabling::{Database, DatabaseConfig, Table, TableId, TableStatus};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut db = Database::open(DatabaseConfig::new(dir.path().join("t.db"))).unwrap();
/// let three = TableId::try_from(3_u32).unwrap();
/// db.seed_tables(&[Table::new(three, "T3", 2).unwrap()]).unwrap();
///
/// let tx = db.begin_transaction().unwrap();
/// let plan = OpenOrderPlan::new(three).build_plan(&tx).unwrap();
///
/// let preview = PlanExecutor::new(&tx).dry_run().execute(&plan).unwrap();
/// assert!(preview.dry_run);
/// assert!(preview.created_order.is_none());
///
/// let result = PlanExecutor::new(&tx).execute(&plan).unwrap();
/// tx.commit().unwrap();
/// assert!(result.created_order.is_some());
///
/// let table = Database::get_table(db.connection(), three).unwrap().unwrap();
/// assert_eq!(table.status(), TableStatus::Occupied);
/// ```
pub struct PlanExecutor<'a> {
    conn: &'a Connection,
    dry_run: bool,
    now: Option<DateTime<Utc>>,
}

impl<'a> PlanExecutor<'a> {
    /// Creates an executor over a connection or open transaction.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            dry_run: false,
            now: None,
        }
    }

    /// Sets the executor to dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Timestamps writes with `now` instead of the current time.
    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Executes the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails. Earlier actions are left in the
    /// caller's transaction, which rolls back when dropped uncommitted.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, self.dry_run);
        let now = self.now.unwrap_or_else(Utc::now);

        if !self.dry_run {
            for action in &plan.actions {
                self.apply(action, now, &mut result)?;
            }
            log::debug!("executed plan: {}", plan.description);
            return Ok(result);
        }

        self.conn
            .execute_batch(&format!("SAVEPOINT {DRY_RUN_SAVEPOINT}"))?;
        let outcome = plan
            .actions
            .iter()
            .try_for_each(|action| self.apply(action, now, &mut result));
        self.conn.execute_batch(&format!(
            "ROLLBACK TO {DRY_RUN_SAVEPOINT}; RELEASE {DRY_RUN_SAVEPOINT}"
        ))?;
        outcome?;

        result.created_reservation = None;
        result.created_order = None;
        log::debug!("dry run of plan: {}", plan.description);
        Ok(result)
    }

    fn apply(
        &self,
        action: &PlanAction,
        now: DateTime<Utc>,
        result: &mut ExecutionResult,
    ) -> Result<()> {
        match action {
            PlanAction::CreateReservation { request, status } => {
                let reservation = Database::insert_reservation(self.conn, request, *status, now)?;
                log::info!(
                    "reservation {} booked on table {}",
                    reservation.id(),
                    reservation.effective_tables()
                );
                result.created_reservation = Some(reservation);
            }
            PlanAction::SetReservationStatus { id, from, to } => {
                let current = Database::get_reservation(self.conn, *id)?
                    .ok_or_else(|| Error::NotFound {
                        resource: format!("reservation {id}"),
                    })?
                    .status();
                if current != *from {
                    return Err(Error::InvalidTransition {
                        from: current,
                        to: *to,
                    });
                }
                Database::update_reservation_status(self.conn, *id, *to, now)?;
                log::info!("reservation {id}: {from} -> {to}");
            }
            PlanAction::SetTableStatus { tables, status } => {
                for &table in tables {
                    if !Database::update_table_status(self.conn, table, *status)? {
                        log::warn!("table {table} disappeared before it could be marked {status}");
                    }
                }
            }
            PlanAction::ReleaseTables {
                tables,
                policy,
                exclude,
            } => {
                let coordinator = ReleaseCoordinator::new(self.conn);
                let releases = if self.dry_run {
                    coordinator.preview(tables, *policy, *exclude)?
                } else {
                    coordinator.release(tables, *policy, *exclude)?
                };
                result.releases.extend(releases);
            }
            PlanAction::CreateOrder { table } => {
                let order = Database::insert_order(self.conn, *table, now)?;
                log::info!("order {} opened on table {table}", order.id());
                result.created_order = Some(order);
            }
            PlanAction::SetOrderStatus { id, status } => {
                if !Database::update_order_status(self.conn, *id, *status, now)? {
                    return Err(Error::NotFound {
                        resource: format!("order {id}"),
                    });
                }
                log::info!("order {id} marked {status}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{ReleaseOutcome, ReleasePolicy};
    use crate::database::test_util::{
        at, create_test_database, insert_test_reservation, test_request, test_table, tid,
    };
    use crate::order::OrderStatus;
    use crate::reservation::ReservationStatus;
    use crate::table::TableStatus;

    #[test]
    fn test_execute_empty_plan() {
        let db = create_test_database();
        let result = PlanExecutor::new(db.connection())
            .execute(&OperationPlan::new("nothing"))
            .unwrap();
        assert!(!result.dry_run);
        assert!(result.actions_taken.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.created_reservation.is_none());
        assert!(result.releases.is_empty());
    }

    #[test]
    fn test_create_reservation() {
        let db = create_test_database();
        let conn = db.connection();
        let plan = OperationPlan::new("Book").add_action(PlanAction::CreateReservation {
            request: test_request(5, &[6], 4, 19),
            status: ReservationStatus::Pending,
        });

        let result = PlanExecutor::new(conn).at(at(12)).execute(&plan).unwrap();
        let created = result.created_reservation.unwrap();
        assert_eq!(created.status(), ReservationStatus::Pending);
        assert_eq!(created.created_at(), at(12));
        assert_eq!(
            Database::get_reservation(conn, created.id()).unwrap(),
            Some(created)
        );
    }

    #[test]
    fn test_status_change_checks_planned_status() {
        let db = create_test_database();
        let conn = db.connection();
        let r = insert_test_reservation(conn, 5, &[], ReservationStatus::Cancelled);
        let plan = OperationPlan::new("Seat").add_action(PlanAction::SetReservationStatus {
            id: r.id(),
            from: ReservationStatus::Confirmed,
            to: ReservationStatus::Seated,
        });

        let err = PlanExecutor::new(conn).execute(&plan).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: ReservationStatus::Cancelled,
                to: ReservationStatus::Seated
            }
        ));
    }

    #[test]
    fn test_dry_run_writes_nothing_but_previews_in_order() {
        let db = create_test_database();
        let conn = db.connection();
        Database::insert_table(conn, &test_table(4, 2)).unwrap();
        Database::update_table_status(conn, tid(4), TableStatus::Occupied).unwrap();
        let order = Database::insert_order(conn, tid(4), at(18)).unwrap();

        let plan = OperationPlan::new("Close")
            .add_action(PlanAction::SetOrderStatus {
                id: order.id(),
                status: OrderStatus::Paid,
            })
            .add_action(PlanAction::ReleaseTables {
                tables: vec![tid(4)],
                policy: ReleasePolicy::FreeIfPossible,
                exclude: None,
            });

        let result = PlanExecutor::new(conn).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.releases[0].outcome, ReleaseOutcome::Freed);

        let table = Database::get_table(conn, tid(4)).unwrap().unwrap();
        assert_eq!(table.status(), TableStatus::Occupied);
        let order = Database::get_order(conn, order.id()).unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Open);
    }

    #[test]
    fn test_dry_run_rolls_back_after_failure() {
        let db = create_test_database();
        let conn = db.connection();
        Database::insert_table(conn, &test_table(4, 2)).unwrap();

        let plan = OperationPlan::new("Broken")
            .add_action(PlanAction::SetTableStatus {
                tables: vec![tid(4)],
                status: TableStatus::Occupied,
            })
            .add_action(PlanAction::SetOrderStatus {
                id: crate::order::OrderId::try_from(99).unwrap(),
                status: OrderStatus::Paid,
            });

        assert!(PlanExecutor::new(conn).dry_run().execute(&plan).is_err());
        let table = Database::get_table(conn, tid(4)).unwrap().unwrap();
        assert_eq!(table.status(), TableStatus::Free);
    }
}
