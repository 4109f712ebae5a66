//! Schema initialization and version checks.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_DINING_TABLES_TABLE, CREATE_METADATA_TABLE, CREATE_ORDERS_TABLE,
    CREATE_ORDER_TABLE_INDEX, CREATE_RESERVATIONS_TABLE, CREATE_RESERVATION_STATUS_INDEX,
    CREATE_RESERVATION_TABLE_INDEX, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Creates all tables, indices, and the schema version row.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tabling::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_DINING_TABLES_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_ORDERS_TABLE, [])?;

    conn.execute(CREATE_RESERVATION_TABLE_INDEX, [])?;
    conn.execute(CREATE_RESERVATION_STATUS_INDEX, [])?;
    conn.execute(CREATE_ORDER_TABLE_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;

    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the schema version, `0` for an uninitialized database.
///
/// # Errors
///
/// Returns an error if the query fails for any reason other than a missing
/// metadata table or row.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<u32>().map_err(|_| Error::DatabaseCorruption {
            details: format!("schema version '{value}' is not a number"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(ref failure, Some(ref message)))
            if failure.code == rusqlite::ErrorCode::Unknown
                && message.contains("no such table") =>
        {
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

/// Initializes a fresh database or verifies an existing one.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] when the stored version
/// differs from [`CURRENT_SCHEMA_VERSION`](super::schema::CURRENT_SCHEMA_VERSION),
/// or any database error.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
