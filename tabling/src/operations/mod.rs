//! Floor operations using the plan-execute pattern.
//!
//! Each command first builds an [`OperationPlan`] (validation and every
//! read), then a [`PlanExecutor`] applies it. Both phases run on the same
//! `BEGIN IMMEDIATE` transaction, so no other terminal can change the floor
//! between the checks and the writes.
//!
//! # Examples
//!
//! ```no_run
//! use tabling::config::ConfigBuilder;
//! use tabling::operations::{BookOptions, BookPlan, PlanExecutor};
//! use tabling::{Database, DatabaseConfig, TableId};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tabling.db")).unwrap();
//! let config = ConfigBuilder::new().build().unwrap();
//! let start = chrono::Utc::now() + chrono::Duration::hours(2);
//! let options = BookOptions::new(TableId::try_from(5_u32).unwrap(), 4, start, "Okafor");
//!
//! let tx = db.begin_transaction().unwrap();
//! let plan = BookPlan::new(options, &config).build_plan(&tx).unwrap();
//! let result = PlanExecutor::new(&tx).execute(&plan).unwrap();
//! tx.commit().unwrap();
//!
//! println!("booked {}", result.created_reservation.unwrap().id());
//! ```

pub mod book;
pub mod executor;
pub mod init;
pub mod orders;
pub mod plan;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use book::{BookOptions, BookPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use orders::{CloseOrderPlan, OpenOrderPlan};
pub use plan::{OperationPlan, PlanAction};
pub use transition::{table_effect, TableEffect, TransitionOptions, TransitionPlan};
