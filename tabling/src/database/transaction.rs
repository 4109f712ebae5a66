//! Transaction management.
//!
//! Every mutation runs inside one `BEGIN IMMEDIATE` transaction: SQLite
//! hands out the write lock at `BEGIN`, so the guard reads and status writes
//! of one operation are serialized against every other terminal.

use rusqlite::{params, Transaction, TransactionBehavior};

use crate::error::{Error, Result};
use crate::table::Table;

use super::connection::Database;
use super::schema::INSERT_TABLE;

impl Database {
    /// Opens a request-scoped write transaction.
    ///
    /// Dropping the transaction without committing rolls back every write
    /// made through it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if another terminal holds the write
    /// lock longer than the busy timeout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tabling::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tabling.db")).unwrap();
    /// let tx = db.begin_transaction().unwrap();
    /// // ... plan and execute against &tx ...
    /// tx.commit().unwrap();
    /// ```
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        let waited = self.busy_timeout();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::from_sqlite(e, waited))
    }

    /// Inserts a floor plan in a single transaction.
    ///
    /// Either every table is inserted or none is. Returns the number of
    /// tables inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a table id already exists or any insert fails.
    pub fn seed_tables(&mut self, tables: &[Table]) -> Result<usize> {
        let tx = self.begin_transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_TABLE)?;
            for table in tables {
                stmt.execute(params![
                    table.id().value(),
                    table.name(),
                    table.zone(),
                    table.capacity(),
                    table.status().as_str(),
                ])?;
            }
        }
        tx.commit()?;

        log::info!("seeded {} tables", tables.len());
        Ok(tables.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, test_table};
    use crate::table::TableStatus;

    #[test]
    fn test_seed_tables() {
        let mut db = create_test_database();
        let inserted = db
            .seed_tables(&[test_table(1, 2), test_table(2, 4), test_table(3, 6)])
            .unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(Database::list_tables(db.connection()).unwrap().len(), 3);
    }

    #[test]
    fn test_seed_tables_is_atomic() {
        let mut db = create_test_database();
        db.seed_tables(&[test_table(2, 4)]).unwrap();

        let result = db.seed_tables(&[test_table(1, 2), test_table(2, 4)]);
        assert!(result.is_err());

        let ids: Vec<u32> = Database::list_tables(db.connection())
            .unwrap()
            .iter()
            .map(|t| t.id().value())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        let mut db = create_test_database();
        db.seed_tables(&[test_table(1, 2)]).unwrap();
        let table = test_table(1, 2).id();

        {
            let tx = db.begin_transaction().unwrap();
            Database::update_table_status(&tx, table, TableStatus::Occupied).unwrap();
        }

        let loaded = Database::get_table(db.connection(), table).unwrap().unwrap();
        assert_eq!(loaded.status(), TableStatus::Free);
    }

    #[test]
    fn test_begin_transaction_times_out_while_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.db");
        let config = crate::database::DatabaseConfig::new(&path)
            .with_busy_timeout(std::time::Duration::from_millis(50));

        let mut holder = Database::open(config.clone()).unwrap();
        let mut waiter = Database::open(config).unwrap();

        let _held = holder.begin_transaction().unwrap();
        let err = waiter.begin_transaction().unwrap_err();
        assert!(matches!(err, Error::LockTimeout { .. }));
    }
}
