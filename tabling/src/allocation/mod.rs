//! Table allocation: competing-claim checks and release.
//!
//! [`AllocationGuard`] answers whether anything else still claims a table.
//! [`ReleaseCoordinator`] uses it to return tables to `free` under one of
//! two [`ReleasePolicy`] variants.

pub mod guard;
pub mod release;

pub use guard::{AllocationGuard, SeatingConflict};
pub use release::{ClaimKind, ReleaseCoordinator, ReleaseOutcome, ReleasePolicy, TableRelease};
