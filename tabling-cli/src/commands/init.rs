//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the tabling data directory and database.

use crate::error::CliError;
use crate::utils::{data_dir, GlobalOptions};
use clap::Args;
use tabling::operations::{init_database, InitOptions};

/// Initialize the data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Replace an existing database (every table, reservation and order is lost)
    #[arg(long)]
    pub overwrite: bool,

    /// Create a commented default configuration file
    #[arg(long)]
    pub with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` has no effect here.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let options = InitOptions::new(data_dir(global)?)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_dry_run(self.dry_run);

        let result = init_database(&options)?;

        if global.quiet {
            return Ok(());
        }

        let verb = if result.dry_run {
            "Would initialize"
        } else {
            "Initialized"
        };
        println!("{verb} tabling in: {}", result.data_dir.display());

        if result.data_dir_created {
            println!("  - Create data directory");
        }
        if result.database_created {
            if self.overwrite {
                println!("  - Recreate database");
            } else {
                println!("  - Create database");
            }
        }
        if result.config_created {
            println!("  - Create default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
