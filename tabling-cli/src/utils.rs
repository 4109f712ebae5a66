//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, time parsing and plan reporting.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rusqlite::Transaction;

use crate::error::CliError;
use tabling::database::{resolve_data_dir, DATABASE_FILE_NAME};
use tabling::operations::{ExecutionResult, OperationPlan, PlanExecutor};
use tabling::{Config, ConfigBuilder, Database, DatabaseConfig};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in seconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir` first, then `TABLING_DATA_DIR`
/// and `~/.tabling`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. `tabling.local.yaml`, then `tabling.yaml` found from the working directory
/// 3. `<data-dir>/config.yaml`
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .with_data_dir(data_dir(global)?)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// The busy timeout comes from `--busy-timeout`, then
/// `maximum_lock_wait_seconds`, then the library default.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);

    if let Some(timeout_seconds) = global.busy_timeout.or(config.maximum_lock_wait_seconds) {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Runs a plan on an open transaction, committing unless it is a dry run.
///
/// A dry run prints the plan to stderr; a real run prints its warnings.
pub fn run_plan(
    tx: Transaction<'_>,
    plan: &OperationPlan,
    dry_run: bool,
    global: &GlobalOptions,
) -> Result<ExecutionResult, CliError> {
    let mut executor = PlanExecutor::new(&tx);
    if dry_run {
        executor = executor.dry_run();
    }
    let result = executor.execute(plan)?;

    if dry_run {
        // Nothing was written; dropping the transaction releases the lock
        drop(tx);
        if !global.quiet {
            eprintln!("Dry run - would perform the following actions:");
            for (i, action) in result.actions_taken.iter().enumerate() {
                eprintln!("  {}. {action}", i + 1);
            }
            for release in &result.releases {
                eprintln!("  table {}: {}", release.table, release.outcome);
            }
        }
    } else {
        tx.commit().map_err(tabling::Error::from)?;
    }

    print_warnings(&result.warnings, global);
    Ok(result)
}

/// Print warnings to stderr unless `--quiet`.
pub fn print_warnings(warnings: &[String], global: &GlobalOptions) {
    if global.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

/// Parse a visit start time.
///
/// Accepts RFC 3339 (`2026-10-19T19:30:00Z`), or a local
/// `YYYY-MM-DD HH:MM` / `YYYY-MM-DDTHH:MM`, or a bare `HH:MM` meaning today.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, CliError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveTime::parse_from_str(value, "%H:%M")
                .ok()
                .map(|time| Local::now().date_naive().and_time(time))
        })
        .ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "cannot parse time '{value}' (use RFC 3339, 'YYYY-MM-DD HH:MM' or 'HH:MM')"
            ))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CliError::InvalidArguments(format!("'{value}' does not exist in the local time zone"))
        })
}

/// Format a timestamp for display in local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_datetime("2026-10-19T19:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 19, 19, 30, 0).unwrap());

        let offset = parse_datetime("2026-10-19T21:30:00+02:00").unwrap();
        assert_eq!(offset, parsed);
    }

    #[test]
    fn test_parse_local_formats_agree() {
        let spaced = parse_datetime("2026-10-19 19:30").unwrap();
        let t = parse_datetime("2026-10-19T19:30").unwrap();
        assert_eq!(spaced, t);
        assert_eq!(format_timestamp(spaced), "2026-10-19 19:30");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_datetime("tomorrow-ish").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_global_data_dir_wins() {
        let global = GlobalOptions {
            data_dir: Some(PathBuf::from("/srv/bistro")),
            ..Default::default()
        };
        assert_eq!(data_dir(&global).unwrap(), PathBuf::from("/srv/bistro"));
    }
}
