//! Table binding: linked-table decoding and effective table sets.
//!
//! A reservation sits on a primary table and may be combined with further
//! linked tables for larger parties. Linked ids reach us in several shapes
//! (a native list from an API payload, a JSON-encoded string from older
//! rows, `NULL`), so they are normalized into [`LinkedTables`] exactly once,
//! where they are loaded. Everything downstream works on
//! [`EffectiveTableSet`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::reservation::Reservation;
use crate::table::TableId;

/// Ordered, duplicate-free list of linked table ids.
///
/// Decoding never fails: anything that is not a list of usable ids
/// degrades to fewer (or no) linked tables.
///
/// # Examples
///
/// ```
/// use tabling::LinkedTables;
///
/// let linked = LinkedTables::from_json_str("[6, \"7\", 6, 0, null]");
/// let ids: Vec<u32> = linked.iter().map(|t| t.value()).collect();
/// assert_eq!(ids, vec![6, 7]);
///
/// assert!(LinkedTables::from_json_str("not json").is_empty());
/// assert!(LinkedTables::from_json_str("{\"a\": 1}").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedTables(Vec<TableId>);

impl LinkedTables {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a list from already-typed ids, collapsing duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = TableId>) -> Self {
        let mut linked = Self::new();
        for id in ids {
            linked.push(id);
        }
        linked
    }

    /// Decodes a JSON-encoded string. Invalid JSON and non-list values yield an empty list.
    #[must_use]
    pub fn from_json_str(encoded: &str) -> Self {
        match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => Self::from_items(&items),
            Ok(_) | Err(_) => Self::new(),
        }
    }

    /// Decodes an arbitrary JSON value.
    ///
    /// A list is used directly, a string is decoded as JSON, anything else is empty.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_items(items),
            Value::String(encoded) => Self::from_json_str(encoded),
            _ => Self::new(),
        }
    }

    fn from_items(items: &[Value]) -> Self {
        Self::from_ids(items.iter().filter_map(table_id_from_item))
    }

    fn push(&mut self, id: TableId) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    /// Returns `true` if no tables are linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of linked tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table is linked.
    #[must_use]
    pub fn contains(&self, table: TableId) -> bool {
        self.0.contains(&table)
    }

    /// Iterates linked ids in stored order.
    pub fn iter(&self) -> impl Iterator<Item = TableId> + '_ {
        self.0.iter().copied()
    }

    /// Returns the ids as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TableId] {
        &self.0
    }

    /// Encodes for storage; an empty list is stored as `NULL`.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let values: Vec<u32> = self.0.iter().map(|t| t.value()).collect();
        serde_json::to_string(&values).ok()
    }
}

/// Accepts positive integers and strings holding one; everything else is a falsy entry.
fn table_id_from_item(item: &Value) -> Option<TableId> {
    match item {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_number))
            .and_then(|v| TableId::try_from(v).ok()),
        Value::String(s) => s
            .trim_matches(|c: char| c.is_ascii_whitespace())
            .parse::<i64>()
            .ok()
            .and_then(|v| TableId::try_from(v).ok()),
        _ => None,
    }
}

// Older writers stored ids such as `7.0`
fn whole_number(v: f64) -> Option<i64> {
    if v.is_finite() && v > 0.0 && v.fract() == 0.0 {
        v.to_string().parse().ok()
    } else {
        None
    }
}

impl Serialize for LinkedTables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkedTables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(Self::from_value).unwrap_or_default())
    }
}

/// The full set of tables a reservation occupies or will occupy.
///
/// Always starts with the primary table, followed by linked tables in
/// stored order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveTableSet {
    tables: Vec<TableId>,
}

impl EffectiveTableSet {
    /// Combines a primary table with its linked tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabling::{EffectiveTableSet, LinkedTables, TableId};
    ///
    /// let primary = TableId::try_from(5_u32).unwrap();
    /// let linked = LinkedTables::from_json_str("[5, 6]");
    /// let set = EffectiveTableSet::new(primary, &linked);
    ///
    /// let ids: Vec<u32> = set.iter().map(|t| t.value()).collect();
    /// assert_eq!(ids, vec![5, 6]);
    /// ```
    #[must_use]
    pub fn new(primary: TableId, linked: &LinkedTables) -> Self {
        let mut tables = Vec::with_capacity(linked.len() + 1);
        tables.push(primary);
        for id in linked.iter() {
            if !tables.contains(&id) {
                tables.push(id);
            }
        }
        Self { tables }
    }

    /// A set holding a single table.
    #[must_use]
    pub fn single(table: TableId) -> Self {
        Self {
            tables: vec![table],
        }
    }

    /// Returns the primary table.
    #[must_use]
    pub fn primary(&self) -> TableId {
        self.tables[0]
    }

    /// Returns `true` if the table is part of the set.
    #[must_use]
    pub fn contains(&self, table: TableId) -> bool {
        self.tables.contains(&table)
    }

    /// Returns the number of tables (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if the set holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterates the tables, primary first.
    pub fn iter(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.iter().copied()
    }

    /// Returns the tables as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TableId] {
        &self.tables
    }
}

impl fmt::Display for EffectiveTableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.tables.iter().map(ToString::to_string).collect();
        write!(f, "{}", ids.join("+"))
    }
}

impl From<EffectiveTableSet> for Vec<TableId> {
    fn from(set: EffectiveTableSet) -> Self {
        set.tables
    }
}

/// Resolves the tables a reservation occupies.
///
/// Pure and infallible: malformed linked data has already degraded to an
/// empty [`LinkedTables`] at load time.
#[must_use]
pub fn resolve_tables(reservation: &Reservation) -> EffectiveTableSet {
    EffectiveTableSet::new(reservation.primary_table(), reservation.linked_tables())
}

#[cfg(test)]
mod proptests;
