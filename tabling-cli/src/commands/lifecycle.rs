//! Reservation lifecycle commands.
//!
//! `confirm`, `seat`, `complete`, `cancel` and `no-show` each move one
//! reservation and apply the matching table effect in the same transaction.

use crate::commands::reservation_id;
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, run_plan, GlobalOptions};
use clap::Args;
use tabling::operations::{TransitionOptions, TransitionPlan};
use tabling::ReservationStatus;

/// Arguments shared by every lifecycle command.
#[derive(Args)]
pub struct TransitionArgs {
    /// Reservation id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl TransitionArgs {
    /// Move the reservation to `target`.
    pub fn execute(
        self,
        target: ReservationStatus,
        global: &GlobalOptions,
    ) -> Result<(), CliError> {
        transition(self.id, target, false, self.dry_run, global)
    }
}

/// Seat a confirmed reservation.
#[derive(Args)]
pub struct SeatCommand {
    #[command(flatten)]
    pub args: TransitionArgs,

    /// Seat even if a table is still claimed; conflicts are reported as warnings
    #[arg(long)]
    pub force: bool,
}

impl SeatCommand {
    /// Execute the seat command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        transition(
            self.args.id,
            ReservationStatus::Seated,
            self.force,
            self.args.dry_run,
            global,
        )
    }
}

fn transition(
    id: i64,
    target: ReservationStatus,
    force: bool,
    dry_run: bool,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    let id = reservation_id(id)?;
    let options = TransitionOptions::new(id, target).with_force(force);

    let config = load_configuration(global)?;
    let mut db = open_database(global, &config)?;
    let tx = db.begin_transaction()?;
    let plan = TransitionPlan::new(options).build_plan(&tx)?;
    let result = run_plan(tx, &plan, dry_run, global)?;

    if dry_run || global.quiet {
        return Ok(());
    }
    eprintln!("Reservation {id} is now {target}");
    for release in &result.releases {
        if !release.outcome.is_free() || global.verbose {
            eprintln!("  table {}: {}", release.table, release.outcome);
        }
    }
    Ok(())
}
