//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BookingConfig, Config};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use tabling::config::{Config, ConfigMerger};
///
/// let low = Config { venue: Some("low".to_string()), ..Default::default() };
/// let high = Config { venue: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.venue, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge `source` into `target`, source winning.
    ///
    /// Scalars are overwritten when set, `booking` merges field by field,
    /// and `floor_plan` is replaced as a whole.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.venue.is_some() {
            target.venue.clone_from(&source.venue);
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_booking) = source.booking {
            target.booking = Some(match &target.booking {
                Some(target_booking) => Self::merge_booking(target_booking, source_booking),
                None => source_booking.clone(),
            });
        }

        if source.floor_plan.is_some() {
            target.floor_plan.clone_from(&source.floor_plan);
        }
    }

    fn merge_booking(target: &BookingConfig, source: &BookingConfig) -> BookingConfig {
        BookingConfig {
            default_visit_minutes: source
                .default_visit_minutes
                .or(target.default_visit_minutes),
            turnover_buffer_minutes: source
                .turnover_buffer_minutes
                .or(target.turnover_buffer_minutes),
            enforce_capacity: source.enforce_capacity.or(target.enforce_capacity),
        }
    }
}
