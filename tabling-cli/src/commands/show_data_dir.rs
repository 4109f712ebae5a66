//! Command to show where tabling keeps its data.

use crate::error::CliError;
use crate::utils::{data_dir, GlobalOptions};
use clap::Args;
use tabling::database::DATABASE_FILE_NAME;

/// Show the resolved data directory path.
#[derive(Args)]
pub struct ShowDataDirCommand {
    /// Print the database file path instead of the directory
    #[arg(long)]
    pub database: bool,
}

impl ShowDataDirCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let dir = data_dir(global)?;
        let shown = if self.database {
            dir.join(DATABASE_FILE_NAME)
        } else {
            dir
        };
        println!("{}", shown.display());
        Ok(())
    }
}
