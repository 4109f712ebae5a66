//! Configuration validation.

use crate::config::schema::{BookingConfig, Config, TableDefinition};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Longest visit a booking may default to (one day).
const MAX_VISIT_MINUTES: u32 = 24 * 60;

/// Validates configuration values and where they may appear.
///
/// # Examples
///
/// ```
/// use tabling::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config, false).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration.
    ///
    /// `is_venue_file` allows the `venue` and `floor_plan` fields, which are
    /// rejected anywhere but `tabling.yaml` and `tabling.local.yaml`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn validate(config: &Config, is_venue_file: bool) -> Result<()> {
        if let Some(ref venue) = config.venue {
            if !is_venue_file {
                return Err(Error::Validation {
                    field: "venue".into(),
                    message: "venue field is only valid in tabling.yaml files".into(),
                });
            }
            Self::validate_identifier("venue", venue)?;
        }

        if let Some(ref floor_plan) = config.floor_plan {
            if !is_venue_file {
                return Err(Error::Validation {
                    field: "floor_plan".into(),
                    message: "floor_plan field is only valid in tabling.yaml files".into(),
                });
            }
            Self::validate_floor_plan(floor_plan)?;
        }

        if let Some(ref booking) = config.booking {
            Self::validate_booking(booking)?;
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    /// Non-blank, no NUL bytes, at most 255 characters.
    fn validate_identifier(field: &str, value: &str) -> Result<()> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }
        if trimmed.contains('\0') {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot contain null bytes".into(),
            });
        }
        if trimmed.len() > 255 {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot exceed 255 characters".into(),
            });
        }

        Ok(())
    }

    fn validate_booking(booking: &BookingConfig) -> Result<()> {
        if let Some(minutes) = booking.default_visit_minutes {
            if minutes == 0 || minutes > MAX_VISIT_MINUTES {
                return Err(Error::Validation {
                    field: "booking.default_visit_minutes".into(),
                    message: format!("Must be between 1 and {MAX_VISIT_MINUTES}"),
                });
            }
        }
        if let Some(minutes) = booking.turnover_buffer_minutes {
            if minutes > MAX_VISIT_MINUTES {
                return Err(Error::Validation {
                    field: "booking.turnover_buffer_minutes".into(),
                    message: format!("Cannot exceed {MAX_VISIT_MINUTES}"),
                });
            }
        }
        Ok(())
    }

    /// Every entry must describe a valid table, and ids must be unique.
    fn validate_floor_plan(floor_plan: &[TableDefinition]) -> Result<()> {
        let mut seen = HashSet::new();

        for (i, definition) in floor_plan.iter().enumerate() {
            definition.to_table().map_err(|e| Error::Validation {
                field: format!("floor_plan[{i}].{}", e.field),
                message: e.reason,
            })?;

            if !seen.insert(definition.id) {
                return Err(Error::Validation {
                    field: format!("floor_plan[{i}].id"),
                    message: format!("Duplicate table id: {}", definition.id),
                });
            }
        }

        Ok(())
    }
}
