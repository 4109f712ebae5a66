//! `TABLING_*` environment variable overrides.

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Visit length override.
pub const DEFAULT_VISIT_MINUTES_ENV: &str = "TABLING_DEFAULT_VISIT_MINUTES";
/// Turnover buffer override.
pub const TURNOVER_BUFFER_MINUTES_ENV: &str = "TABLING_TURNOVER_BUFFER_MINUTES";
/// Capacity enforcement override.
pub const ENFORCE_CAPACITY_ENV: &str = "TABLING_ENFORCE_CAPACITY";
/// Lock wait override.
pub const MAXIMUM_LOCK_WAIT_SECONDS_ENV: &str = "TABLING_MAXIMUM_LOCK_WAIT_SECONDS";
/// Auto-initialization override.
pub const DISABLE_AUTOINIT_ENV: &str = "TABLING_DISABLE_AUTOINIT";
/// Output format override.
pub const OUTPUT_FORMAT_ENV: &str = "TABLING_OUTPUT_FORMAT";

/// Applies environment overrides on top of file-based configuration.
///
/// # Examples
///
/// ```no_run
/// use tabling::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Reads every `TABLING_*` configuration variable that is set.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the variable when a value does not
    /// parse.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        Self::apply_from(config, |name| env::var(name).ok())
    }

    /// Same as [`apply_overrides`](Self::apply_overrides) with a custom
    /// variable source.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the variable when a value does not
    /// parse.
    pub fn apply_from<F>(config: &mut Config, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(DEFAULT_VISIT_MINUTES_ENV) {
            let minutes = Self::parse_number(DEFAULT_VISIT_MINUTES_ENV, &val)?;
            config
                .booking
                .get_or_insert_with(Default::default)
                .default_visit_minutes = Some(minutes);
        }

        if let Some(val) = lookup(TURNOVER_BUFFER_MINUTES_ENV) {
            let minutes = Self::parse_number(TURNOVER_BUFFER_MINUTES_ENV, &val)?;
            config
                .booking
                .get_or_insert_with(Default::default)
                .turnover_buffer_minutes = Some(minutes);
        }

        if let Some(val) = lookup(ENFORCE_CAPACITY_ENV) {
            let enforce = Self::parse_bool(ENFORCE_CAPACITY_ENV, &val)?;
            config
                .booking
                .get_or_insert_with(Default::default)
                .enforce_capacity = Some(enforce);
        }

        if let Some(val) = lookup(MAXIMUM_LOCK_WAIT_SECONDS_ENV) {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number(MAXIMUM_LOCK_WAIT_SECONDS_ENV, &val)?);
        }

        if let Some(val) = lookup(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        if let Some(val) = lookup(OUTPUT_FORMAT_ENV) {
            let format = OutputFormat::from_str(&val).map_err(|message| Error::Validation {
                field: OUTPUT_FORMAT_ENV.into(),
                message,
            })?;
            config.output_format = Some(format);
        }

        Ok(())
    }

    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_bool_parsing_case_insensitive(upper in any::<bool>(), pick in 0usize..8) {
            let variants = ["true", "1", "yes", "on", "false", "0", "no", "off"];
            let raw = variants[pick];
            let input = if upper { raw.to_uppercase() } else { raw.to_string() };

            let parsed = EnvironmentConfig::parse_bool("test", &input);
            prop_assert_eq!(parsed.ok(), Some(pick < 4));
        }

        #[test]
        fn prop_numbers_round_trip(value in any::<u32>()) {
            let parsed: u32 = EnvironmentConfig::parse_number("test", &value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_non_numeric_rejected(s in "[a-z]{1,8}") {
            prop_assert!(EnvironmentConfig::parse_number::<u32>("test", &s).is_err());
        }
    }
}
