//! Plan types for floor operations.
//!
//! A plan lists what an operation will do without doing it. Plans are built
//! and executed on the same open transaction.

use std::fmt::Write as _;

use crate::allocation::ReleasePolicy;
use crate::order::{OrderId, OrderStatus};
use crate::reservation::{ReservationId, ReservationRequest, ReservationStatus};
use crate::table::{TableId, TableStatus};

/// A single step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Store a new reservation.
    CreateReservation {
        /// The validated booking.
        request: ReservationRequest,
        /// Initial status.
        status: ReservationStatus,
    },

    /// Move a reservation to a new status.
    SetReservationStatus {
        /// The reservation.
        id: ReservationId,
        /// Status seen while planning.
        from: ReservationStatus,
        /// New status.
        to: ReservationStatus,
    },

    /// Write a status to each table.
    SetTableStatus {
        /// Tables to update.
        tables: Vec<TableId>,
        /// New status.
        status: TableStatus,
    },

    /// Hand tables to the release coordinator.
    ReleaseTables {
        /// Tables to release.
        tables: Vec<TableId>,
        /// Release strategy.
        policy: ReleasePolicy,
        /// Reservation being closed, never a competing claim.
        exclude: Option<ReservationId>,
    },

    /// Open an order on a table.
    CreateOrder {
        /// The table.
        table: TableId,
    },

    /// Move an order to a new status.
    SetOrderStatus {
        /// The order.
        id: OrderId,
        /// New status.
        status: OrderStatus,
    },
}

fn join_tables(tables: &[TableId]) -> String {
    let mut out = String::new();
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{table}");
    }
    out
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation { request, status } => format!(
                "Create {status} reservation for {} ({} guests) on table {} at {}",
                request.guest_name(),
                request.party_size(),
                request.effective_tables(),
                request.window()
            ),
            Self::SetReservationStatus { id, from, to } => {
                format!("Move reservation {id} from {from} to {to}")
            }
            Self::SetTableStatus { tables, status } => {
                format!("Mark table(s) {} {status}", join_tables(tables))
            }
            Self::ReleaseTables { tables, policy, .. } => {
                format!("Release table(s) {} ({policy})", join_tables(tables))
            }
            Self::CreateOrder { table } => format!("Open order on table {table}"),
            Self::SetOrderStatus { id, status } => format!("Mark order {id} {status}"),
        }
    }
}

/// A complete operation plan.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// What the operation does.
    pub description: String,

    /// Actions in execution order.
    pub actions: Vec<PlanAction>,

    /// Warnings for the operator.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates an empty plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabling::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Seat reservation 4");
    /// assert_eq!(plan.description, "Seat reservation 4");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Appends an action.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabling::operations::{OperationPlan, PlanAction};
    /// use tabling::{TableId, TableStatus};
    ///
    /// let plan = OperationPlan::new("Walk-in")
    ///     .add_action(PlanAction::SetTableStatus {
    ///         tables: vec![TableId::try_from(3_u32).unwrap()],
    ///         status: TableStatus::Occupied,
    ///     });
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends a warning.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
