//! Layered configuration for tabling.
//!
//! # Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (`ConfigBuilder::with_config`)
//! 2. Environment variables (`TABLING_*`)
//! 3. Per-terminal venue config (`tabling.local.yaml`)
//! 4. Venue config (`tabling.yaml`, found by walking up from the working directory)
//! 5. User config (`~/.tabling/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use tabling::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/bistro"))
//!     .build()
//!     .unwrap();
//!
//! println!("visits last {} minutes", config.default_visit_minutes());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{
    ConfigLoader, ConfigSource, LOCAL_CONFIG_FILE, USER_CONFIG_FILE, VENUE_CONFIG_FILE,
};
pub use merger::ConfigMerger;
pub use schema::{
    BookingConfig, Config, OutputFormat, TableDefinition, DEFAULT_TURNOVER_BUFFER_MINUTES,
    DEFAULT_VISIT_MINUTES,
};
pub use validator::ConfigValidator;
