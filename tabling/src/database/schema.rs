//! Database schema definitions and SQL constants.
//!
//! This module contains the table definitions, indices, and shared SQL for
//! the floor plan, reservations, and orders.

/// Current schema version for the database.
///
/// Stored in the metadata table and checked on every open.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the physical tables registry.
///
/// Table ids come from the floor plan, so they are not autoincremented.
pub const CREATE_DINING_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS dining_tables (
        id INTEGER PRIMARY KEY NOT NULL CHECK (id > 0),
        name TEXT NOT NULL,
        zone TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        status TEXT NOT NULL DEFAULT 'free'
            CHECK (status IN ('free', 'reserved', 'occupied'))
    )";

/// SQL statement to create the reservations table.
///
/// `linked_table_ids` has no declared type: older rows carry JSON text,
/// `NULL`, or arbitrary values, and are normalized when loaded. Table ids are
/// not foreign keys because tables may leave the floor plan while
/// reservations referencing them remain as history.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        primary_table_id INTEGER NOT NULL,
        linked_table_ids,
        party_size INTEGER NOT NULL CHECK (party_size > 0),
        starts_at INTEGER NOT NULL,
        ends_at INTEGER NOT NULL,
        status TEXT NOT NULL,
        guest_name TEXT NOT NULL,
        phone TEXT,
        notes TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the orders table.
pub const CREATE_ORDERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_id INTEGER NOT NULL,
        status TEXT NOT NULL,
        opened_at INTEGER NOT NULL,
        closed_at INTEGER
    )";

/// Speeds up the primary-table half of the membership prefilter.
pub const CREATE_RESERVATION_TABLE_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_primary_table ON reservations(primary_table_id, status)";

/// Speeds up status-filtered listings.
pub const CREATE_RESERVATION_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status, starts_at)";

/// Speeds up active-order checks.
pub const CREATE_ORDER_TABLE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_orders_table ON orders(table_id, status)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a table record.
pub const INSERT_TABLE: &str = r"
    INSERT INTO dining_tables (id, name, zone, capacity, status)
    VALUES (?, ?, ?, ?, ?)
";

/// SQL statement to insert a reservation; the id is assigned by the store.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (primary_table_id, linked_table_ids, party_size, starts_at, ends_at, status,
     guest_name, phone, notes, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// Column list shared by every reservation query, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "id, primary_table_id, linked_table_ids, party_size, \
     starts_at, ends_at, status, guest_name, phone, notes, created_at, updated_at";

/// Superset prefilter for reservations touching a table.
///
/// Matches the primary column or any linked entry that SQLite can cast to
/// the table id. Anything but JSON list text is treated as an empty list;
/// the `CASE` arms are evaluated in order so `json_type` never sees invalid
/// input. Exact membership is decided after decoding.
pub const TOUCHES_TABLE_PREDICATE: &str = r"
    (primary_table_id = ?1 OR EXISTS (
        SELECT 1 FROM json_each(
            CASE
                WHEN typeof(linked_table_ids) <> 'text' THEN '[]'
                WHEN NOT json_valid(linked_table_ids) THEN '[]'
                WHEN json_type(linked_table_ids) <> 'array' THEN '[]'
                ELSE linked_table_ids
            END
        ) WHERE CAST(value AS INTEGER) = ?1
    ))
";
