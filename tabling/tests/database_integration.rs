//! Integration tests for the database layer.
//!
//! These tests exercise the full database stack including auto-creation,
//! schema versioning, WAL mode, legacy linked-table data, and transaction
//! atomicity.

mod common;

use rusqlite::{params, Connection};
use tempfile::tempdir;

use common::{at, create_floor, create_test_database_path, table, tid};
use tabling::allocation::{AllocationGuard, ReleaseCoordinator, ReleaseOutcome, ReleasePolicy};
use tabling::database::{get_schema_version, Database, DatabaseConfig, CURRENT_SCHEMA_VERSION};
use tabling::{Error, ReservationStatus, TableStatus};

/// Inserts a reservation row the way an older writer would, with an
/// arbitrary value in the linked column.
fn insert_legacy_reservation(
    conn: &Connection,
    primary: u32,
    linked: rusqlite::types::Value,
    status: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO reservations (primary_table_id, linked_table_ids, party_size, starts_at, \
         ends_at, status, guest_name, created_at, updated_at) \
         VALUES (?1, ?2, 4, ?3, ?4, ?5, 'Legacy', ?3, ?3)",
        params![
            primary,
            linked,
            at(19).timestamp(),
            at(21).timestamp(),
            status
        ],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn test_database_auto_creation() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("venue").join("tabling.db");
    assert!(!db_path.parent().unwrap().exists());

    let db = Database::open(DatabaseConfig::new(&db_path)).unwrap();

    assert!(db_path.exists());
    assert_eq!(
        get_schema_version(db.connection()).unwrap(),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_missing_database_without_auto_create() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("missing").join("tabling.db");

    let err = Database::open(DatabaseConfig::new(&db_path).without_auto_create()).unwrap_err();
    assert!(matches!(err, Error::DataDirectoryNotFound { .. }));
    assert!(!db_path.exists());
}

#[test]
fn test_schema_version_compatibility() {
    let db_path = create_test_database_path();
    Database::open(DatabaseConfig::new(&db_path)).unwrap();
    Database::open(DatabaseConfig::new(&db_path)).unwrap();

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();
    }

    match Database::open(DatabaseConfig::new(&db_path)) {
        Err(Error::UnsupportedSchemaVersion { expected, found }) => {
            assert_eq!(expected, CURRENT_SCHEMA_VERSION);
            assert_eq!(found, 999);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }
}

#[test]
fn test_wal_mode_enabled() {
    let db = create_floor(1);
    let mode: String = db
        .connection()
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn test_integrity_check_passes() {
    let db = create_floor(4);
    Database::verify_integrity(db.connection()).unwrap();
}

#[test]
fn test_read_only_sees_committed_floor() {
    let db_path = create_test_database_path();
    {
        let mut db = Database::open(DatabaseConfig::new(&db_path)).unwrap();
        db.seed_tables(&[table(1, 2), table(2, 6)]).unwrap();
    }

    let reader = Database::open(DatabaseConfig::new(&db_path).read_only()).unwrap();
    let tables = Database::list_tables(reader.connection()).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].capacity(), 6);
}

#[test]
fn test_seed_tables_is_atomic() {
    let mut db = create_floor(2);

    // Table 2 already exists, so table 3 must not be inserted either
    let result = db.seed_tables(&[table(3, 4), table(2, 4)]);
    assert!(result.is_err());
    assert!(Database::get_table(db.connection(), tid(3))
        .unwrap()
        .is_none());
    assert_eq!(Database::list_tables(db.connection()).unwrap().len(), 2);
}

#[test]
fn test_legacy_linked_values_are_normalized() {
    use rusqlite::types::Value;

    let db = create_floor(8);
    let conn = db.connection();
    let mixed = insert_legacy_reservation(
        conn,
        5,
        Value::Text(r#"[6, "7", 0, null, 6, 5]"#.into()),
        "seated",
    );
    insert_legacy_reservation(conn, 1, Value::Text("not json".into()), "seated");
    insert_legacy_reservation(conn, 2, Value::Integer(3), "seated");
    insert_legacy_reservation(conn, 3, Value::Null, "seated");

    let all = Database::list_reservations(conn, &[ReservationStatus::Seated]).unwrap();
    assert_eq!(all.len(), 4);

    let combined = all.iter().find(|r| r.id().value() == mixed).unwrap();
    let tables: Vec<u32> = combined.effective_tables().iter().map(|t| t.value()).collect();
    assert_eq!(tables, vec![5, 6, 7]);

    for r in all.iter().filter(|r| r.id().value() != mixed) {
        assert_eq!(r.effective_tables().len(), 1, "reservation {}", r.id());
    }

    let guard = AllocationGuard::new(conn);
    assert!(guard.has_competing_seated_reservation(tid(7), None).unwrap());
    assert!(!guard.has_competing_seated_reservation(tid(4), None).unwrap());
}

#[test]
fn test_release_skips_tables_removed_from_floor() {
    let db = create_floor(3);
    let conn = db.connection();
    Database::update_table_status(conn, tid(2), TableStatus::Occupied).unwrap();
    Database::delete_table(conn, tid(3)).unwrap();

    let releases = ReleaseCoordinator::new(conn)
        .release(&[tid(2), tid(3)], ReleasePolicy::FreeIfPossible, None)
        .unwrap();

    assert_eq!(releases[0].outcome, ReleaseOutcome::Freed);
    assert_eq!(releases[1].outcome, ReleaseOutcome::Missing);
}

#[test]
fn test_legacy_whole_number_ids_keep_their_table() {
    use rusqlite::types::Value;

    let db = create_floor(8);
    let conn = db.connection();
    let float = insert_legacy_reservation(conn, 1, Value::Text("[7.0]".into()), "seated");
    let padded = insert_legacy_reservation(conn, 2, Value::Text(" [\" 7 \"] ".into()), "seated");
    insert_legacy_reservation(conn, 3, Value::Text("[7.5]".into()), "seated");

    let on_seven =
        Database::reservations_on_table(conn, tid(7), &[ReservationStatus::Seated]).unwrap();
    let ids: Vec<i64> = on_seven.iter().map(|r| r.id().value()).collect();
    assert_eq!(ids, vec![float, padded]);

    let combined = Database::get_reservation(conn, tabling::ReservationId::try_from(float).unwrap())
        .unwrap()
        .unwrap();
    let tables: Vec<u32> = combined.effective_tables().iter().map(|t| t.value()).collect();
    assert_eq!(tables, vec![1, 7]);

    let guard = AllocationGuard::new(conn);
    assert!(guard.has_competing_seated_reservation(tid(7), None).unwrap());
}
