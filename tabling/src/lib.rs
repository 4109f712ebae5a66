#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tabling
//!
//! Reservation lifecycle management and table allocation for restaurant
//! floors shared by several staff terminals.
//!
//! ## Core Types
//!
//! - [`Table`] and [`TableId`]: physical tables and their [`TableStatus`]
//! - [`Reservation`], [`ReservationStatus`] and [`VisitWindow`]: the booking lifecycle
//! - [`LinkedTables`] and [`EffectiveTableSet`]: combined tables for large parties
//! - [`Order`]: the slice of a POS order that holds a table
//! - [`allocation`]: competing-claim checks and the two release policies
//! - [`operations`]: plan/execute commands run inside one transaction
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use tabling::{resolve_tables, LinkedTables, TableId};
//!
//! let linked = LinkedTables::from_json_str(r#"[6, "7", 0, null, 6]"#);
//! let ids: Vec<u32> = linked.iter().map(TableId::value).collect();
//! assert_eq!(ids, vec![6, 7]);
//! ```

pub mod allocation;
pub mod binding;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod order;
pub mod reservation;
pub mod table;

pub use binding::{resolve_tables, EffectiveTableSet, LinkedTables};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    BookOptions, BookPlan, CloseOrderPlan, ExecutionResult, OpenOrderPlan, OperationPlan,
    PlanAction, PlanExecutor, TransitionOptions, TransitionPlan,
};
pub use order::{Order, OrderId, OrderStatus};
pub use reservation::{
    Reservation, ReservationId, ReservationRequest, ReservationStatus, VisitWindow,
};
pub use table::{Table, TableId, TableStatus};
