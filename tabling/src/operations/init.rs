//! Explicit data directory and database initialization.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::USER_CONFIG_FILE;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// Options for database initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a commented `config.yaml` if none exists.
    pub create_config: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
}

impl InitOptions {
    /// Creates options for `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overwrite: false,
            create_config: false,
            dry_run: false,
        }
    }

    /// Sets whether to replace an existing database.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write the default configuration file.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What initialization did, or would do on a dry run.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory was created.
    pub data_dir_created: bool,
    /// The database was created or recreated.
    pub database_created: bool,
    /// The configuration file was written.
    pub config_created: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
    /// Nothing was written.
    pub dry_run: bool,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# tabling configuration
#
# Venue files (tabling.yaml) may also set `venue` and `floor_plan`.

# booking:
#   default_visit_minutes: 120
#   turnover_buffer_minutes: 0
#   enforce_capacity: true

# Seconds to wait for another terminal's lock (default: 5)
# maximum_lock_wait_seconds: 5

# table, json, csv or tsv
# output_format: table
";

/// Creates the data directory, the database and optionally `config.yaml`.
///
/// An existing `config.yaml` is never replaced.
///
/// # Errors
///
/// Returns an error if the database exists and `overwrite` is off, or if
/// a directory, file or the database cannot be created.
///
/// # Examples
///
/// ```
/// use tabling::operations::{init_database, InitOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// let options = InitOptions::new(dir.path().join("tabling")).with_create_config(true);
///
/// let result = init_database(&options).unwrap();
/// assert!(result.data_dir_created);
/// assert!(result.database_created);
/// assert!(result.config_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let data_dir = &options.data_dir;
    let db_path = data_dir.join(DATABASE_FILE_NAME);
    let config_path = data_dir.join(USER_CONFIG_FILE);
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    let result = InitResult {
        data_dir_created: !data_dir.exists(),
        database_created: true,
        config_created: options.create_config && !config_path.exists(),
        data_dir: data_dir.clone(),
        dry_run: options.dry_run,
    };
    if options.dry_run {
        return Ok(result);
    }

    if result.data_dir_created {
        fs::create_dir_all(data_dir)?;
    }
    if db_exists {
        remove_database_files(&db_path)?;
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    log::info!("initialized database at {}", db_path.display());

    if result.config_created {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    }

    Ok(result)
}

/// Removes the database and its WAL sidecar files.
fn remove_database_files(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        match fs::remove_file(&sidecar) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
    }
    Ok(())
}
