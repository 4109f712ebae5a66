//! `tabling validate`: check a configuration file without loading the rest
//! of the hierarchy.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::{Path, PathBuf};
use tabling::config::{ConfigLoader, ConfigValidator, LOCAL_CONFIG_FILE, VENUE_CONFIG_FILE};

/// Validate a tabling configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: PathBuf,

    /// Apply venue-file rules (`venue`, `floor_plan`) whatever the file is named
    #[arg(long)]
    pub venue: bool,
}

/// Whether `path` is named like a venue file.
fn is_venue_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == VENUE_CONFIG_FILE || name == LOCAL_CONFIG_FILE)
}

impl ValidateCommand {
    /// Prints "Configuration is valid" or reports the first problem.
    ///
    /// Parse and validation problems exit 1; a missing file exits 4.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = &self.config_path;
        if !path.is_file() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let venue_rules = self.venue || is_venue_file(path);
        let outcome = ConfigLoader::load_file(path)
            .and_then(|config| ConfigValidator::validate(&config, venue_rules).map(|()| config));

        match outcome {
            Ok(config) => {
                println!("Configuration is valid");
                if global.verbose {
                    let tables = config.floor_plan.as_ref().map_or(0, Vec::len);
                    eprintln!(
                        "{}: {} rules, {tables} floor plan table(s)",
                        path.display(),
                        if venue_rules { "venue" } else { "user" }
                    );
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                Err(CliError::SemanticFailure(
                    "Configuration validation failed".to_string(),
                ))
            }
        }
    }
}
