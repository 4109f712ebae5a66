//! Orders as seen by table allocation.
//!
//! Billing lives elsewhere; allocation only needs to know which table an
//! order sits on and whether it is still active.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;
use crate::table::TableId;

/// Store-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Returns the underlying identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for OrderId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            Err(ValidationError {
                field: "order_id".into(),
                message: format!("order id must be positive, got {value}"),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| ValidationError {
            field: "order_id".into(),
            message: format!("'{s}' is not an order id"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order status.
///
/// # Examples
///
/// ```
/// use tabling::OrderStatus;
///
/// assert!(OrderStatus::Pending.is_active());
/// assert!(!OrderStatus::Paid.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Being taken.
    Open,
    /// Sent, awaiting payment.
    Pending,
    /// Settled.
    Paid,
    /// Closed without a payment record.
    Closed,
    /// Voided.
    Voided,
}

impl OrderStatus {
    /// Statuses that keep a table busy.
    pub const ACTIVE: [Self; 2] = [Self::Open, Self::Pending];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Closed => "closed",
            Self::Voided => "voided",
        }
    }

    /// Returns `true` for `open` and `pending`.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "closed" => Ok(Self::Closed),
            "voided" | "void" => Ok(Self::Voided),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown order status '{other}'"),
            }),
        }
    }
}

/// An order placed at a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub(crate) id: OrderId,
    pub(crate) table: TableId,
    pub(crate) status: OrderStatus,
    pub(crate) opened_at: DateTime<Utc>,
    pub(crate) closed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the table the order sits on.
    #[must_use]
    pub const fn table(&self) -> TableId {
        self.table
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns when the order was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns when the order left the active statuses.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }
}
