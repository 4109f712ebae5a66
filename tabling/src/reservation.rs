//! Reservation types and the reservation state machine.
//!
//! A reservation is a booking intent for a party on one primary table,
//! optionally combined with linked tables. Reservations are never deleted;
//! cancelled and completed ones remain for history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::binding::{resolve_tables, EffectiveTableSet, LinkedTables};
use crate::error::{Error, Result};
use crate::table::TableId;

/// Store-assigned reservation identifier.
///
/// # Examples
///
/// ```
/// use tabling::ReservationId;
///
/// let id = ReservationId::try_from(42).unwrap();
/// assert_eq!(id.to_string(), "42");
/// assert!(ReservationId::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Returns the underlying identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ReservationId {
    type Error = ValidationError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        if value <= 0 {
            Err(ValidationError {
                field: "reservation_id".into(),
                message: format!("reservation id must be positive, got {value}"),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl FromStr for ReservationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| ValidationError {
            field: "reservation_id".into(),
            message: format!("'{s}' is not a reservation id"),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a reservation.
///
/// ```text
/// pending -> confirmed -> seated -> completed
///    \__________\___________\____> cancelled | no_show
/// ```
///
/// # Examples
///
/// ```
/// use tabling::ReservationStatus;
///
/// assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
/// assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::Seated));
/// assert!(ReservationStatus::Completed.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booked, not yet confirmed.
    Pending,
    /// Confirmed; the tables are held.
    Confirmed,
    /// Guests are at the table.
    Seated,
    /// The visit ended normally.
    Completed,
    /// Cancelled before or during the visit.
    Cancelled,
    /// The party never arrived.
    NoShow,
}

impl ReservationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Seated,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Statuses that still expect to use their tables at the booked time.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Statuses that count as an active claim for cancellation-driven release.
    #[must_use]
    pub const fn claims_table(self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }

    /// Returns `true` if the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Seated)
                | (Self::Seated, Self::Completed)
                | (
                    Self::Pending | Self::Confirmed | Self::Seated,
                    Self::Cancelled | Self::NoShow
                )
        )
    }

    /// Validates a transition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the lifecycle forbids it.
    pub fn transition_to(self, next: Self) -> Result<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "seated" => Ok(Self::Seated),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "no_show" | "noshow" => Ok(Self::NoShow),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{other}'"),
            }),
        }
    }
}

/// The scheduled time window of a visit, `[starts_at, ends_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitWindow {
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl VisitWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns an error if `ends_at` is not after `starts_at`.
    pub fn new(
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> std::result::Result<Self, ValidationError> {
        if ends_at <= starts_at {
            return Err(ValidationError {
                field: "ends_at".into(),
                message: "visit must end after it starts".into(),
            });
        }
        Ok(Self { starts_at, ends_at })
    }

    /// Creates a window of `minutes` starting at `starts_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is zero.
    pub fn starting_at(
        starts_at: DateTime<Utc>,
        minutes: u32,
    ) -> std::result::Result<Self, ValidationError> {
        Self::new(starts_at, starts_at + Duration::minutes(i64::from(minutes)))
    }

    /// Returns the start.
    #[must_use]
    pub const fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Returns the exclusive end.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Returns `true` if the windows overlap once each is followed by `turnover`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use tabling::VisitWindow;
    ///
    /// let at = |h| Utc.with_ymd_and_hms(2026, 10, 19, h, 0, 0).unwrap();
    /// let early = VisitWindow::new(at(18), at(20)).unwrap();
    /// let late = VisitWindow::new(at(20), at(22)).unwrap();
    ///
    /// assert!(!early.overlaps(&late, Duration::zero()));
    /// assert!(early.overlaps(&late, Duration::minutes(15)));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self, turnover: Duration) -> bool {
        self.starts_at < other.ends_at + turnover && other.starts_at < self.ends_at + turnover
    }
}

impl fmt::Display for VisitWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.starts_at.format("%Y-%m-%d %H:%M"),
            self.ends_at.format("%H:%M")
        )
    }
}

/// A validated booking request, not yet stored.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tabling::{LinkedTables, ReservationRequest, TableId, VisitWindow};
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 19, 19, 0, 0).unwrap();
/// let window = VisitWindow::starting_at(start, 120).unwrap();
/// let request = ReservationRequest::builder(TableId::try_from(5_u32).unwrap(), 6, window)
///     .linked(LinkedTables::from_json_str("[6]"))
///     .guest("Okafor")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.effective_tables().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    primary_table: TableId,
    #[serde(default)]
    linked: LinkedTables,
    party_size: u16,
    window: VisitWindow,
    guest_name: String,
    phone: Option<String>,
    notes: Option<String>,
}

impl ReservationRequest {
    /// Starts building a request.
    #[must_use]
    pub fn builder(primary_table: TableId, party_size: u16, window: VisitWindow) -> RequestBuilder {
        RequestBuilder {
            primary_table,
            linked: LinkedTables::new(),
            party_size,
            window,
            guest_name: String::new(),
            phone: None,
            notes: None,
        }
    }

    /// Returns the primary table.
    #[must_use]
    pub const fn primary_table(&self) -> TableId {
        self.primary_table
    }

    /// Returns the linked tables.
    #[must_use]
    pub const fn linked_tables(&self) -> &LinkedTables {
        &self.linked
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> u16 {
        self.party_size
    }

    /// Returns the visit window.
    #[must_use]
    pub const fn window(&self) -> VisitWindow {
        self.window
    }

    /// Returns the guest name.
    #[must_use]
    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    /// Returns the contact phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns free-form notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the tables this booking would occupy.
    #[must_use]
    pub fn effective_tables(&self) -> EffectiveTableSet {
        EffectiveTableSet::new(self.primary_table, &self.linked)
    }
}

/// Builder for [`ReservationRequest`].
#[derive(Debug)]
pub struct RequestBuilder {
    primary_table: TableId,
    linked: LinkedTables,
    party_size: u16,
    window: VisitWindow,
    guest_name: String,
    phone: Option<String>,
    notes: Option<String>,
}

impl RequestBuilder {
    /// Sets the linked (combined) tables.
    #[must_use]
    pub fn linked(mut self, linked: LinkedTables) -> Self {
        self.linked = linked;
        self
    }

    /// Sets the guest name. Whitespace is trimmed.
    #[must_use]
    pub fn guest(mut self, name: impl Into<String>) -> Self {
        self.guest_name = name.into().trim().to_string();
        self
    }

    /// Sets the contact phone. Blank values are dropped.
    #[must_use]
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = non_blank(phone);
        self
    }

    /// Sets notes. Blank values are dropped.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = non_blank(notes);
        self
    }

    /// Validates and builds the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the party is empty, the guest name is blank, or
    /// the linked tables include the primary table.
    pub fn build(self) -> std::result::Result<ReservationRequest, ValidationError> {
        if self.party_size == 0 {
            return Err(ValidationError {
                field: "party_size".into(),
                message: "party size must be at least 1".into(),
            });
        }
        if self.guest_name.is_empty() {
            return Err(ValidationError {
                field: "guest_name".into(),
                message: "guest name must be non-empty".into(),
            });
        }
        if self.linked.contains(self.primary_table) {
            return Err(ValidationError {
                field: "linked_table_ids".into(),
                message: format!(
                    "linked tables must not include the primary table {}",
                    self.primary_table
                ),
            });
        }

        Ok(ReservationRequest {
            primary_table: self.primary_table,
            linked: self.linked,
            party_size: self.party_size,
            window: self.window,
            guest_name: self.guest_name,
            phone: self.phone,
            notes: self.notes,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub(crate) id: ReservationId,
    pub(crate) primary_table: TableId,
    pub(crate) linked: LinkedTables,
    pub(crate) party_size: u16,
    pub(crate) window: VisitWindow,
    pub(crate) status: ReservationStatus,
    pub(crate) guest_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Materializes a stored reservation from a request.
    #[must_use]
    pub fn from_request(
        id: ReservationId,
        request: ReservationRequest,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            primary_table: request.primary_table,
            linked: request.linked,
            party_size: request.party_size,
            window: request.window,
            status,
            guest_name: request.guest_name,
            phone: request.phone,
            notes: request.notes,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the primary table.
    #[must_use]
    pub const fn primary_table(&self) -> TableId {
        self.primary_table
    }

    /// Returns the linked tables.
    #[must_use]
    pub const fn linked_tables(&self) -> &LinkedTables {
        &self.linked
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> u16 {
        self.party_size
    }

    /// Returns the visit window.
    #[must_use]
    pub const fn window(&self) -> VisitWindow {
        self.window
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the guest name.
    #[must_use]
    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    /// Returns the contact phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns free-form notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the last status change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the tables this reservation occupies or will occupy.
    #[must_use]
    pub fn effective_tables(&self) -> EffectiveTableSet {
        resolve_tables(self)
    }
}

/// Validation error for reservation fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod proptests;
