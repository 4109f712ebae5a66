//! Concurrency tests across terminals sharing one database file.
//!
//! Every terminal opens its own connection. The only coordination is
//! SQLite's write lock taken by `BEGIN IMMEDIATE`.

mod common;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::{booked_as, create_test_database_path, reservation_status, status_of, table, tid};
use tabling::operations::{OpenOrderPlan, PlanExecutor, TransitionOptions, TransitionPlan};
use tabling::{
    Database, DatabaseConfig, Error, ReservationId, ReservationStatus, Result, TableStatus,
};

fn terminal(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path).with_busy_timeout(Duration::from_secs(10))).unwrap()
}

fn seat(path: &Path, id: ReservationId) -> Result<()> {
    let mut db = terminal(path);
    let tx = db.begin_transaction()?;
    let plan = TransitionPlan::new(TransitionOptions::new(id, ReservationStatus::Seated))
        .build_plan(&tx)?;
    PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(())
}

fn prepared_floor(tables: u32) -> (PathBuf, Database) {
    let path = create_test_database_path();
    let mut db = terminal(&path);
    let floor: Vec<_> = (1..=tables).map(|id| table(id, 4)).collect();
    db.seed_tables(&floor).unwrap();
    (path, db)
}

#[test]
fn test_two_terminals_seating_same_table() {
    for _ in 0..5 {
        let (path, mut db) = prepared_floor(2);
        let early = booked_as(&mut db, 1, &[], 17, ReservationStatus::Confirmed);
        let late = booked_as(&mut db, 1, &[2], 20, ReservationStatus::Confirmed);

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = [early.id(), late.id()]
            .into_iter()
            .map(|id| {
                let path = path.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    seat(&path, id)
                })
            })
            .collect();
        let results: Vec<Result<()>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "results: {results:?}");
        let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(
            matches!(loser, Error::TableUnavailable { table, .. } if *table == tid(1)),
            "unexpected error: {loser}"
        );

        let seated = [early.id(), late.id()]
            .iter()
            .filter(|&&id| reservation_status(&db, id) == ReservationStatus::Seated)
            .count();
        assert_eq!(seated, 1);
        assert_eq!(status_of(&db, 1), TableStatus::Occupied);
    }
}

#[test]
fn test_concurrent_orders_on_distinct_tables() {
    const TERMINALS: u32 = 8;
    let (path, db) = prepared_floor(TERMINALS);

    let barrier = Arc::new(Barrier::new(TERMINALS as usize));
    let handles: Vec<_> = (1..=TERMINALS)
        .map(|id| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || -> Result<()> {
                let mut db = terminal(&path);
                barrier.wait();
                let tx = db.begin_transaction()?;
                let plan = OpenOrderPlan::new(tid(id)).build_plan(&tx)?;
                PlanExecutor::new(&tx).execute(&plan)?;
                tx.commit()?;
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    for id in 1..=TERMINALS {
        assert_eq!(status_of(&db, id), TableStatus::Occupied);
    }
    assert_eq!(
        Database::list_orders(db.connection(), &[]).unwrap().len(),
        TERMINALS as usize
    );
}

#[test]
fn test_held_lock_times_out() {
    let (path, mut holder) = prepared_floor(1);
    let _tx = holder.begin_transaction().unwrap();

    let mut other =
        Database::open(DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(100)))
            .unwrap();
    let err = other.begin_transaction().unwrap_err();
    assert!(matches!(err, Error::LockTimeout { .. }), "got {err}");
}

#[test]
fn test_uncommitted_transaction_rolls_back() {
    let (path, mut db) = prepared_floor(1);
    {
        let tx = db.begin_transaction().unwrap();
        let plan = OpenOrderPlan::new(tid(1)).build_plan(&tx).unwrap();
        PlanExecutor::new(&tx).execute(&plan).unwrap();
        // Dropped without commit
    }

    let reader = terminal(&path);
    assert_eq!(status_of(&reader, 1), TableStatus::Free);
    assert!(Database::list_orders(reader.connection(), &[])
        .unwrap()
        .is_empty());
}
