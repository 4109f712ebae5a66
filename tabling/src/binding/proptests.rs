//! Property-based tests for linked-table decoding and effective table sets.

use super::{EffectiveTableSet, LinkedTables};
use crate::table::TableId;
use proptest::prelude::*;
use serde_json::Value;

fn table_id_strategy() -> impl Strategy<Value = TableId> {
    (1u32..=64).prop_map(|v| TableId::try_from(v).unwrap())
}

// Arbitrary JSON entries a legacy row might carry in its linked list
fn item_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-5i64..=64).prop_map(Value::from),
        (-5i64..=64).prop_map(|v| Value::from(v.to_string())),
        Just(Value::Null),
        Just(Value::Bool(false)),
        Just(Value::from("")),
        any::<f64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 2000,
        .. ProptestConfig::default()
    })]

    // The effective set always holds the primary, first, and never repeats an id
    #[test]
    fn effective_set_contains_primary_without_duplicates(
        primary in table_id_strategy(),
        items in prop::collection::vec(item_strategy(), 0..12)
    ) {
        let linked = LinkedTables::from_value(&Value::Array(items));
        let set = EffectiveTableSet::new(primary, &linked);

        prop_assert_eq!(set.primary(), primary);
        prop_assert!(set.contains(primary));

        let mut ids: Vec<TableId> = set.iter().collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    // Every linked id survives into the effective set
    #[test]
    fn effective_set_covers_linked(
        primary in table_id_strategy(),
        linked in prop::collection::vec(table_id_strategy(), 0..8)
    ) {
        let linked = LinkedTables::from_ids(linked);
        let set = EffectiveTableSet::new(primary, &linked);

        for id in linked.iter() {
            prop_assert!(set.contains(id));
        }
        prop_assert!(set.len() <= linked.len() + 1);
    }

    // Arbitrary text never panics and non-list text resolves to the primary alone
    #[test]
    fn arbitrary_text_never_panics(primary in table_id_strategy(), text in ".{0,40}") {
        let linked = LinkedTables::from_json_str(&text);
        let set = EffectiveTableSet::new(primary, &linked);

        prop_assert!(set.contains(primary));
        if !text.trim_start().starts_with('[') {
            prop_assert_eq!(set.len(), 1);
        }
    }

    // Null or empty linked data yields exactly the primary table
    #[test]
    fn empty_linked_resolves_to_primary(primary in table_id_strategy()) {
        for linked in [
            LinkedTables::from_value(&Value::Null),
            LinkedTables::from_json_str("[]"),
            LinkedTables::from_json_str(""),
            LinkedTables::new(),
        ] {
            let set = EffectiveTableSet::new(primary, &linked);
            prop_assert_eq!(set.as_slice(), &[primary][..]);
        }
    }

    // Storage encoding decodes back to the same list
    #[test]
    fn storage_encoding_is_stable(linked in prop::collection::vec(table_id_strategy(), 0..8)) {
        let linked = LinkedTables::from_ids(linked);
        let decoded = linked
            .to_json()
            .map_or_else(LinkedTables::new, |s| LinkedTables::from_json_str(&s));
        prop_assert_eq!(decoded, linked);
    }
}
