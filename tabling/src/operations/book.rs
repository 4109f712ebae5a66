//! Booking: validation and planning of new reservations.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::allocation::AllocationGuard;
use crate::binding::LinkedTables;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{ReservationId, ReservationRequest, ReservationStatus, VisitWindow};
use crate::table::TableId;

use super::plan::{OperationPlan, PlanAction};

/// Options for a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOptions {
    /// Primary table.
    pub primary: TableId,
    /// Tables bonded to the primary for this visit.
    pub linked: LinkedTables,
    /// Number of guests.
    pub party_size: u16,
    /// Scheduled arrival.
    pub starts_at: DateTime<Utc>,
    /// Explicit end; wins over `minutes`.
    pub ends_at: Option<DateTime<Utc>>,
    /// Visit length; the configured default when neither end nor length is set.
    pub minutes: Option<u32>,
    /// Guest name.
    pub guest_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl BookOptions {
    /// Creates options for a single-table booking of default length.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use tabling::operations::BookOptions;
    /// use tabling::{LinkedTables, TableId};
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 10, 19, 19, 30, 0).unwrap();
    /// let options = BookOptions::new(TableId::try_from(5_u32).unwrap(), 6, start, "Okafor")
    ///     .with_linked(LinkedTables::from_json_str("[6]"))
    ///     .with_minutes(90);
    ///
    /// assert_eq!(options.minutes, Some(90));
    /// assert_eq!(options.linked.len(), 1);
    /// ```
    #[must_use]
    pub fn new(
        primary: TableId,
        party_size: u16,
        starts_at: DateTime<Utc>,
        guest_name: impl Into<String>,
    ) -> Self {
        Self {
            primary,
            linked: LinkedTables::new(),
            party_size,
            starts_at,
            ends_at: None,
            minutes: None,
            guest_name: guest_name.into(),
            phone: None,
            notes: None,
        }
    }

    /// Sets the linked tables.
    #[must_use]
    pub fn with_linked(mut self, linked: LinkedTables) -> Self {
        self.linked = linked;
        self
    }

    /// Sets the visit length.
    #[must_use]
    pub const fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = Some(minutes);
        self
    }

    /// Sets an explicit end time.
    #[must_use]
    pub const fn with_ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// Plans a new `pending` reservation.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tabling::config::ConfigBuilder;
/// use tabling::operations::{BookOptions, BookPlan, PlanExecutor};
/// use tabling::{Database, DatabaseConfig, Table, TableId};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut db = Database::open(DatabaseConfig::new(dir.path().join("t.db"))).unwrap();
/// let five = TableId::try_from(5_u32).unwrap();
/// db.seed_tables(&[Table::new(five, "Window", 4).unwrap()]).unwrap();
/// let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 19, 19, 0, 0).unwrap();
/// let tx = db.begin_transaction().unwrap();
/// let plan = BookPlan::new(BookOptions::new(five, 4, start, "Okafor"), &config)
///     .build_plan(&tx)
///     .unwrap();
/// let result = PlanExecutor::new(&tx).execute(&plan).unwrap();
/// tx.commit().unwrap();
///
/// let booked = result.created_reservation.unwrap();
/// assert_eq!(booked.window().ends_at() - booked.window().starts_at(), chrono::Duration::minutes(120));
/// ```
pub struct BookPlan<'a> {
    options: BookOptions,
    config: &'a Config,
}

impl<'a> BookPlan<'a> {
    /// Creates a planner.
    #[must_use]
    pub const fn new(options: BookOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    /// Validates the booking against the floor and builds the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a bad party size, guest name, window,
    ///   linked list, or a party larger than the tables seat
    /// - [`Error::TableUnavailable`] if an effective table does not exist
    /// - [`Error::ReservationConflict`] if a table is already booked for an
    ///   overlapping window
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let request = self.request()?;
        let tables = request.effective_tables();

        let mut capacity: u32 = 0;
        for table in tables.iter() {
            let record = Database::get_table(conn, table)?.ok_or_else(|| Error::TableUnavailable {
                table,
                reason: "table does not exist".into(),
            })?;
            capacity += u32::from(record.capacity());
        }

        let party = u32::from(request.party_size());
        if self.config.enforce_capacity() && capacity < party {
            return Err(Error::Validation {
                field: "party_size".into(),
                message: format!(
                    "party of {party} exceeds the {capacity} seats of table {tables}"
                ),
            });
        }

        let turnover = Duration::minutes(i64::from(self.config.turnover_buffer_minutes()));
        let guard = AllocationGuard::new(conn);
        let mut conflicts: BTreeMap<ReservationId, Vec<TableId>> = BTreeMap::new();
        for table in tables.iter() {
            for other in guard.overlapping_reservations(table, &request.window(), turnover, None)? {
                conflicts.entry(other.id()).or_default().push(table);
            }
        }
        if !conflicts.is_empty() {
            let details = conflicts
                .iter()
                .map(|(id, on)| {
                    let on: Vec<String> = on.iter().map(ToString::to_string).collect();
                    format!("reservation {id} holds table {}", on.join(", "))
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::ReservationConflict {
                details: format!("{} overlaps: {details}", request.window()),
            });
        }

        let mut plan = OperationPlan::new(format!(
            "Book table {tables} for {} ({} guests)",
            request.guest_name(),
            request.party_size()
        ));
        if !self.config.enforce_capacity() && capacity < party {
            plan = plan.add_warning(format!(
                "party of {party} exceeds the {capacity} seats of table {tables}"
            ));
        }

        Ok(plan.add_action(PlanAction::CreateReservation {
            request,
            status: ReservationStatus::Pending,
        }))
    }

    fn request(&self) -> Result<ReservationRequest> {
        let options = &self.options;
        let window = match options.ends_at {
            Some(ends_at) => VisitWindow::new(options.starts_at, ends_at)?,
            None => VisitWindow::starting_at(
                options.starts_at,
                options
                    .minutes
                    .unwrap_or_else(|| self.config.default_visit_minutes()),
            )?,
        };

        Ok(
            ReservationRequest::builder(options.primary, options.party_size, window)
                .linked(options.linked.clone())
                .guest(options.guest_name.clone())
                .phone(options.phone.clone())
                .notes(options.notes.clone())
                .build()?,
        )
    }
}
