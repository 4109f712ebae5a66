//! Property-based tests for operation sequences.
//!
//! Random interleavings of bookings, lifecycle moves and orders run against
//! a real database; after every step the floor must stay consistent.

use proptest::prelude::*;

use crate::binding::LinkedTables;
use crate::config::Config;
use crate::database::test_util::{at, create_test_database, test_table, tid};
use crate::database::Database;
use crate::error::Result;
use crate::order::{OrderId, OrderStatus};
use crate::reservation::{ReservationId, ReservationStatus};
use crate::table::{TableId, TableStatus};

use super::{
    BookOptions, BookPlan, CloseOrderPlan, OpenOrderPlan, OperationPlan, PlanExecutor,
    TransitionOptions, TransitionPlan,
};

const TABLES: u32 = 4;

#[derive(Debug, Clone)]
enum Step {
    Book {
        primary: u32,
        linked: Vec<u32>,
        hour: u32,
    },
    Move {
        pick: usize,
        target: ReservationStatus,
    },
    OpenOrder {
        table: u32,
    },
    CloseOrder {
        pick: usize,
        status: OrderStatus,
    },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let status = prop::sample::select(ReservationStatus::ALL.to_vec());
    let closed = prop::sample::select(vec![OrderStatus::Paid, OrderStatus::Closed, OrderStatus::Voided]);
    prop_oneof![
        (1..=TABLES, prop::collection::vec(0..=TABLES + 1, 0..3), 17u32..22).prop_map(
            |(primary, linked, hour)| Step::Book {
                primary,
                linked,
                hour
            }
        ),
        (any::<usize>(), status).prop_map(|(pick, target)| Step::Move { pick, target }),
        (1..=TABLES).prop_map(|table| Step::OpenOrder { table }),
        (any::<usize>(), closed).prop_map(|(pick, status)| Step::CloseOrder { pick, status }),
    ]
}

fn plan_step(
    conn: &rusqlite::Connection,
    step: &Step,
    reservations: &[ReservationId],
    orders: &[OrderId],
    config: &Config,
) -> Option<Result<OperationPlan>> {
    Some(match step {
        Step::Book {
            primary,
            linked,
            hour,
        } => {
            let linked = LinkedTables::from_ids(
                linked
                    .iter()
                    .filter_map(|&id| TableId::try_from(id).ok()),
            );
            let options = BookOptions::new(tid(*primary), 2, at(*hour), "Guest").with_linked(linked);
            BookPlan::new(options, config).build_plan(conn)
        }
        Step::Move { pick, target } => {
            let id = *reservations.get(pick % reservations.len().max(1))?;
            TransitionPlan::new(TransitionOptions::new(id, *target)).build_plan(conn)
        }
        Step::OpenOrder { table } => OpenOrderPlan::new(tid(*table)).build_plan(conn),
        Step::CloseOrder { pick, status } => {
            let id = *orders.get(pick % orders.len().max(1))?;
            CloseOrderPlan::new(id, *status).build_plan(conn)
        }
    })
}

fn check_floor(conn: &rusqlite::Connection) -> std::result::Result<(), TestCaseError> {
    let seated = Database::list_reservations(conn, &[ReservationStatus::Seated]).unwrap();
    let active_orders = Database::list_orders(conn, &OrderStatus::ACTIVE).unwrap();

    for id in 1..=TABLES {
        let table = tid(id);
        let status = Database::get_table(conn, table).unwrap().unwrap().status();

        let seated_here: Vec<_> = seated
            .iter()
            .filter(|r| r.effective_tables().contains(table))
            .collect();
        prop_assert!(seated_here.len() <= 1, "table {} seats {:?}", table, seated_here);
        if !seated_here.is_empty() {
            prop_assert_eq!(status, TableStatus::Occupied, "seated table {} not occupied", table);
        }
        if active_orders.iter().any(|o| o.table() == table) {
            prop_assert_eq!(status, TableStatus::Occupied, "table {} has an open order", table);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn floor_stays_consistent(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let mut db = create_test_database();
        for id in 1..=TABLES {
            Database::insert_table(db.connection(), &test_table(id, 4)).unwrap();
        }
        let config = Config::default();
        let mut reservations = Vec::new();
        let mut orders = Vec::new();

        for step in &steps {
            let tx = db.begin_transaction().unwrap();
            let Some(planned) = plan_step(&tx, step, &reservations, &orders, &config) else {
                continue;
            };
            let Ok(plan) = planned else {
                continue;
            };
            let result = PlanExecutor::new(&tx).at(at(12)).execute(&plan).unwrap();
            tx.commit().unwrap();

            reservations.extend(result.created_reservation.map(|r| r.id()));
            orders.extend(result.created_order.map(|o| o.id()));
            check_floor(db.connection())?;
        }
    }

    #[test]
    fn dry_run_never_writes(steps in prop::collection::vec(step_strategy(), 1..20)) {
        let mut db = create_test_database();
        for id in 1..=TABLES {
            Database::insert_table(db.connection(), &test_table(id, 4)).unwrap();
        }
        let config = Config::default();
        let snapshot = |conn: &rusqlite::Connection| {
            (
                Database::list_tables(conn).unwrap(),
                Database::list_reservations(conn, &[]).unwrap(),
                Database::list_orders(conn, &[]).unwrap(),
            )
        };

        let before = snapshot(db.connection());
        for step in &steps {
            let tx = db.begin_transaction().unwrap();
            if let Some(Ok(plan)) = plan_step(&tx, step, &[], &[], &config) {
                PlanExecutor::new(&tx).dry_run().execute(&plan).unwrap();
            }
            tx.commit().unwrap();
        }
        prop_assert_eq!(before, snapshot(db.connection()));
    }
}
