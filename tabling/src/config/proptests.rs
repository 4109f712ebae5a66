//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{BookingConfig, Config, OutputFormat, TableDefinition};
use proptest::prelude::*;

fn booking_strategy() -> impl Strategy<Value = BookingConfig> {
    (
        prop::option::of(1u32..=480),
        prop::option::of(0u32..=60),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(visit, buffer, enforce)| BookingConfig {
            default_visit_minutes: visit,
            turnover_buffer_minutes: buffer,
            enforce_capacity: enforce,
        })
}

fn floor_plan_strategy() -> impl Strategy<Value = Vec<TableDefinition>> {
    prop::collection::btree_set(1u32..100, 0..6).prop_map(|ids| {
        ids.into_iter()
            .map(|id| TableDefinition {
                id,
                name: format!("T{id}"),
                capacity: 4,
                zone: None,
            })
            .collect()
    })
}

fn output_format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Table),
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Tsv),
    ]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of("[a-z]{1,20}"),
        prop::option::of(booking_strategy()),
        prop::option::of(floor_plan_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..=120),
        prop::option::of(output_format_strategy()),
    )
        .prop_map(
            |(venue, booking, floor_plan, autoinit, lock_wait, output_format)| Config {
                venue,
                booking,
                floor_plan,
                disable_autoinit: autoinit,
                maximum_lock_wait_seconds: lock_wait,
                output_format,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // A set field in the higher layer wins; an unset one keeps the lower value.
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.venue.clone(), high.venue.clone().or(low.venue.clone()));
        prop_assert_eq!(result.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(result.output_format, high.output_format.or(low.output_format));
        prop_assert_eq!(
            result.turnover_buffer_minutes(),
            high.booking
                .as_ref()
                .and_then(|b| b.turnover_buffer_minutes)
                .unwrap_or_else(|| low.turnover_buffer_minutes())
        );
        if high.floor_plan.is_some() {
            prop_assert_eq!(&result.floor_plan, &high.floor_plan);
        } else {
            prop_assert_eq!(&result.floor_plan, &low.floor_plan);
        }
    }

    // The empty config is an identity on both sides.
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut right = config.clone();
        ConfigMerger::merge_into(&mut right, &Config::default());
        prop_assert_eq!(&right, &config);

        let mut left = Config::default();
        ConfigMerger::merge_into(&mut left, &config);
        prop_assert_eq!(&left, &config);
    }

    // Layers can be grouped in any way before merging.
    #[test]
    fn config_merge_associative(
        a in config_strategy(),
        b in config_strategy(),
        c in config_strategy()
    ) {
        let mut left = a.clone();
        ConfigMerger::merge_into(&mut left, &b);
        ConfigMerger::merge_into(&mut left, &c);

        let mut b_then_c = b;
        ConfigMerger::merge_into(&mut b_then_c, &c);
        let mut right = a;
        ConfigMerger::merge_into(&mut right, &b_then_c);

        prop_assert_eq!(left, right);
    }

    // Merging a layer twice changes nothing the second time.
    #[test]
    fn config_merge_idempotent(base in config_strategy(), layer in config_strategy()) {
        let mut once = base;
        ConfigMerger::merge_into(&mut once, &layer);
        let mut twice = once.clone();
        ConfigMerger::merge_into(&mut twice, &layer);
        prop_assert_eq!(once, twice);
    }
}
