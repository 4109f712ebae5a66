//! Database layer for tables, reservations, and orders.
//!
//! A `SQLite` store shared by every staff terminal of a venue. Store
//! functions are associated functions taking a `&Connection`, so callers
//! compose them inside one request-scoped transaction.
//!
//! # Examples
//!
//! ```no_run
//! use tabling::database::{Database, DatabaseConfig};
//! use tabling::{Table, TableId, TableStatus};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tabling.db")).unwrap();
//!
//! let tx = db.begin_transaction().unwrap();
//! let table = Table::new(TableId::try_from(5_u32).unwrap(), "T5", 4).unwrap();
//! Database::insert_table(&tx, &table).unwrap();
//! Database::update_table_status(&tx, table.id(), TableStatus::Occupied).unwrap();
//! tx.commit().unwrap();
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
