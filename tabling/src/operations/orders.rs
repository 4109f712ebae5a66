//! Opening and closing orders.
//!
//! An order marks its table occupied (a walk-in, when no reservation is
//! seated there). Closing the last active order hands the table back to the
//! release coordinator.

use rusqlite::Connection;

use crate::allocation::ReleasePolicy;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::order::{OrderId, OrderStatus};
use crate::table::{TableId, TableStatus};

use super::plan::{OperationPlan, PlanAction};

/// Plans a new order on a table.
pub struct OpenOrderPlan {
    table: TableId,
}

impl OpenOrderPlan {
    /// Creates a planner.
    #[must_use]
    pub const fn new(table: TableId) -> Self {
        Self { table }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the table does not exist.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let table = self.table;
        let record = Database::get_table(conn, table)?.ok_or_else(|| Error::NotFound {
            resource: format!("table {table}"),
        })?;

        let mut plan = OperationPlan::new(format!("Open order on table {table}"))
            .add_action(PlanAction::CreateOrder { table });

        match record.status() {
            TableStatus::Occupied => {}
            TableStatus::Reserved => {
                plan = plan
                    .add_warning(format!("table {table} is held for a confirmed reservation"))
                    .add_action(PlanAction::SetTableStatus {
                        tables: vec![table],
                        status: TableStatus::Occupied,
                    });
            }
            TableStatus::Free => {
                plan = plan.add_action(PlanAction::SetTableStatus {
                    tables: vec![table],
                    status: TableStatus::Occupied,
                });
            }
        }
        Ok(plan)
    }
}

/// Plans closing an order and releasing its table.
pub struct CloseOrderPlan {
    order: OrderId,
    status: OrderStatus,
}

impl CloseOrderPlan {
    /// Creates a planner closing `order` as `status`.
    #[must_use]
    pub const fn new(order: OrderId, status: OrderStatus) -> Self {
        Self { order, status }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `status` is not a closed variant or the
    ///   order is already closed
    /// - [`Error::NotFound`] if the order does not exist
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let id = self.order;
        if self.status.is_active() {
            return Err(Error::Validation {
                field: "status".into(),
                message: format!("{} does not close an order", self.status),
            });
        }

        let order = Database::get_order(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("order {id}"),
        })?;
        if !order.status().is_active() {
            return Err(Error::Validation {
                field: "order".into(),
                message: format!("order {id} is already {}", order.status()),
            });
        }

        Ok(
            OperationPlan::new(format!("Close order {id} as {}", self.status))
                .add_action(PlanAction::SetOrderStatus {
                    id,
                    status: self.status,
                })
                .add_action(PlanAction::ReleaseTables {
                    tables: vec![order.table()],
                    policy: ReleasePolicy::FreeIfPossible,
                    exclude: None,
                }),
        )
    }
}
