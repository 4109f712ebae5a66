//! Configuration schema definitions.
//!
//! Every field is optional so partial files can be layered; defaults are
//! applied by [`ConfigBuilder`](super::ConfigBuilder) and read through the
//! accessor methods on [`Config`].

use serde::{Deserialize, Serialize};

use crate::table::{InvalidTableError, Table, TableId};

/// Default length of a visit when a booking gives no end time.
pub const DEFAULT_VISIT_MINUTES: u32 = 120;

/// Default gap required between two visits on the same table.
pub const DEFAULT_TURNOVER_BUFFER_MINUTES: u32 = 0;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use tabling::config::{BookingConfig, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         turnover_buffer_minutes: Some(15),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.turnover_buffer_minutes(), 15);
/// assert_eq!(config.default_visit_minutes(), 120);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Venue identifier (only valid in `tabling.yaml` files).
    pub venue: Option<String>,

    /// Booking rules.
    pub booking: Option<BookingConfig>,

    /// Tables to import into the registry (only valid in `tabling.yaml` files).
    pub floor_plan: Option<Vec<TableDefinition>>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for another terminal's lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Visit length used when a booking has no explicit end.
    #[must_use]
    pub fn default_visit_minutes(&self) -> u32 {
        self.booking
            .as_ref()
            .and_then(|b| b.default_visit_minutes)
            .unwrap_or(DEFAULT_VISIT_MINUTES)
    }

    /// Gap required after each visit before the next may start.
    #[must_use]
    pub fn turnover_buffer_minutes(&self) -> u32 {
        self.booking
            .as_ref()
            .and_then(|b| b.turnover_buffer_minutes)
            .unwrap_or(DEFAULT_TURNOVER_BUFFER_MINUTES)
    }

    /// Whether bookings must fit the aggregate capacity of their tables.
    #[must_use]
    pub fn enforce_capacity(&self) -> bool {
        self.booking
            .as_ref()
            .and_then(|b| b.enforce_capacity)
            .unwrap_or(true)
    }
}

/// Booking rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Visit length when no end time is given.
    pub default_visit_minutes: Option<u32>,

    /// Minutes a table needs between visits.
    pub turnover_buffer_minutes: Option<u32>,

    /// Reject bookings larger than the combined capacity of their tables.
    pub enforce_capacity: Option<bool>,
}

/// One table of a venue floor plan.
///
/// # Examples
///
/// ```
/// use tabling::config::TableDefinition;
///
/// let yaml = "id: 5\nname: Window\ncapacity: 4\nzone: terrace";
/// let table: TableDefinition = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(table.capacity, 4);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    /// Floor-plan table number.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Seats.
    pub capacity: u16,
    /// Hall, terrace, bar...
    pub zone: Option<String>,
}

impl TableDefinition {
    /// Builds the registry record for this entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is zero, or the name, zone or capacity
    /// is invalid.
    pub fn to_table(&self) -> Result<Table, InvalidTableError> {
        let table = Table::new(TableId::try_from(self.id)?, &self.name, self.capacity)?;
        match &self.zone {
            Some(zone) => table.in_zone(zone),
            None => Ok(table),
        }
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use tabling::config::OutputFormat;
///
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// assert_eq!("tsv".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            other => Err(format!(
                "invalid output format '{other}' (expected table, json, csv, or tsv)"
            )),
        }
    }
}
