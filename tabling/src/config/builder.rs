//! Layered configuration assembly.

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::{
    BookingConfig, Config, DEFAULT_TURNOVER_BUFFER_MINUTES, DEFAULT_VISIT_MINUTES,
};
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Builds the effective configuration from files, environment and overrides.
///
/// # Examples
///
/// ```
/// use tabling::config::{BookingConfig, Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         booking: Some(BookingConfig {
///             default_visit_minutes: Some(90),
///             ..Default::default()
///         }),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.default_visit_minutes(), 90);
/// assert!(config.enforce_capacity());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    overrides: Option<Config>,
    skip_files: bool,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Creates a builder that reads files from the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore every configuration file.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignore `TABLING_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Programmatic overrides, applied last.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Directory the venue file search starts from.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Data directory holding the user `config.yaml`.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Loads, merges, fills defaults and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, an environment
    /// variable is malformed, or any layer fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => std::env::current_dir().map_err(Error::Io)?,
            };
            let sources = ConfigLoader::load_all(&working_dir, self.data_dir.as_deref())?;
            for source in &sources {
                ConfigValidator::validate(&source.config, source.is_venue_file()).map_err(
                    |e| match e {
                        Error::Validation { field, message } => Error::Validation {
                            field: format!("{}: {field}", source.path.display()),
                            message,
                        },
                        other => other,
                    },
                )?;
            }
            config = ConfigMerger::merge(sources);
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        Self::apply_defaults(&mut config);
        ConfigValidator::validate(&config, true)?;
        Ok(config)
    }

    fn apply_defaults(config: &mut Config) {
        let booking = config.booking.get_or_insert_with(BookingConfig::default);
        booking
            .default_visit_minutes
            .get_or_insert(DEFAULT_VISIT_MINUTES);
        booking
            .turnover_buffer_minutes
            .get_or_insert(DEFAULT_TURNOVER_BUFFER_MINUTES);
        booking.enforce_capacity.get_or_insert(true);
        config.disable_autoinit.get_or_insert(false);
    }
}
