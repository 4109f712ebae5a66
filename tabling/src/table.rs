//! Table identifiers, statuses, and the physical table record.
//!
//! Tables are the shared resource the allocation core hands out. Their
//! status is the only field that changes during service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A valid table identifier (non-zero).
///
/// Identifier 0 is rejected because legacy floor-plan data uses it as an
/// "unset" marker.
///
/// # Examples
///
/// ```
/// use tabling::TableId;
///
/// let table = TableId::try_from(5_u32).unwrap();
/// assert_eq!(table.value(), 5);
///
/// assert!(TableId::try_from(0_u32).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TableId(u32);

impl TableId {
    /// Returns the underlying identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TableId {
    type Error = InvalidTableError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidTableError {
                field: "table_id".into(),
                reason: "table id 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<i64> for TableId {
    type Error = InvalidTableError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed = u32::try_from(value).map_err(|_| InvalidTableError {
            field: "table_id".into(),
            reason: format!("table id {value} is out of range"),
        })?;
        Self::try_from(narrowed)
    }
}

impl From<TableId> for u32 {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl FromStr for TableId {
    type Err = InvalidTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.trim().parse().map_err(|_| InvalidTableError {
            field: "table_id".into(),
            reason: format!("'{s}' is not a table number"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid table data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTableError {
    /// The offending field.
    pub field: String,
    /// The reason the value is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidTableError {}

/// Occupancy status of a physical table.
///
/// # Examples
///
/// ```
/// use tabling::TableStatus;
///
/// let status: TableStatus = "occupied".parse().unwrap();
/// assert_eq!(status, TableStatus::Occupied);
/// assert!(!status.is_free());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Nobody uses or holds the table.
    Free,
    /// Held for a confirmed reservation that has not arrived yet.
    Reserved,
    /// Guests are physically at the table.
    Occupied,
}

impl TableStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        }
    }

    /// Returns `true` for [`TableStatus::Free`].
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = InvalidTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            other => Err(InvalidTableError {
                field: "status".into(),
                reason: format!("unknown table status '{other}'"),
            }),
        }
    }
}

/// A physical table on the floor plan.
///
/// # Examples
///
/// ```
/// use tabling::{Table, TableId, TableStatus};
///
/// let table = Table::new(TableId::try_from(5_u32).unwrap(), "T5", 4)
///     .unwrap()
///     .in_zone("terrace")
///     .unwrap();
///
/// assert_eq!(table.capacity(), 4);
/// assert_eq!(table.zone(), "terrace");
/// assert_eq!(table.status(), TableStatus::Free);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    name: String,
    zone: String,
    capacity: u16,
    status: TableStatus,
}

impl Table {
    /// The zone assigned when none is given.
    pub const DEFAULT_ZONE: &'static str = "main";

    /// Creates a free table in the default zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the capacity is zero.
    pub fn new(id: TableId, name: impl Into<String>, capacity: u16) -> Result<Self, InvalidTableError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(InvalidTableError {
                field: "name".into(),
                reason: "table name must be non-empty".into(),
            });
        }
        if capacity == 0 {
            return Err(InvalidTableError {
                field: "capacity".into(),
                reason: "capacity must be at least 1".into(),
            });
        }

        Ok(Self {
            id,
            name,
            zone: Self::DEFAULT_ZONE.to_string(),
            capacity,
            status: TableStatus::Free,
        })
    }

    /// Places the table in a zone (hall, terrace, bar...).
    ///
    /// # Errors
    ///
    /// Returns an error if the zone name is blank.
    pub fn in_zone(mut self, zone: impl Into<String>) -> Result<Self, InvalidTableError> {
        let zone = zone.into().trim().to_string();
        if zone.is_empty() {
            return Err(InvalidTableError {
                field: "zone".into(),
                reason: "zone must be non-empty".into(),
            });
        }
        self.zone = zone;
        Ok(self)
    }

    /// Sets the status; used when loading persisted tables.
    #[must_use]
    pub const fn with_status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the table identifier.
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the zone name.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the seating capacity.
    #[must_use]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TableStatus {
        self.status
    }
}
