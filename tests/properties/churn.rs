//! Property tests for tables under random create/drop churn.
//!
//! A model of the expected live set is kept next to the registry and the
//! two are compared after every step.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::common::*;
use interned_records::{Handle, Identity};

#[derive(Debug, Clone)]
enum Op {
    Create(i64),
    Drop(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_i64..16).prop_map(Op::Create),
        (0_i64..16).prop_map(Op::Drop),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the registry's live set always equals the set of held records.
    #[test]
    fn property_live_set_tracks_holders(ops in proptest::collection::vec(op(), 1..64)) {
        for lookup in LOOKUPS {
            let registry = registry_with(lookup);
            let mut held: BTreeMap<i64, Handle<User>> = BTreeMap::new();

            for op in &ops {
                match *op {
                    Op::Create(id) => {
                        let created = user(&registry, "u", id, "u@x");
                        if let Some(existing) = held.get(&id) {
                            prop_assert!(Handle::ptr_eq(existing, &created));
                        }
                        held.insert(id, created);
                    }
                    Op::Drop(id) => {
                        held.remove(&id);
                    }
                }

                prop_assert_eq!(registry.live_count::<User>(), held.len());
                prop_assert_eq!(registry.composite_key_count::<User>(), held.len());
                for (id, handle) in &held {
                    prop_assert_eq!(handle.id.get(), Some(id));
                }
            }

            drop(held);
            prop_assert_eq!(registry.table_count(), 0);
        }
    }

    /// PROPERTY: composite keys never exceed the peak number of live records.
    #[test]
    fn property_composite_keys_stay_dense(ops in proptest::collection::vec(op(), 1..64)) {
        let registry = registry_with(LOOKUPS[0]);
        let mut held: BTreeMap<i64, Handle<User>> = BTreeMap::new();
        let mut peak = 0;

        for op in &ops {
            match *op {
                Op::Create(id) => {
                    held.insert(id, user(&registry, "u", id, "u@x"));
                }
                Op::Drop(id) => {
                    held.remove(&id);
                }
            }
            peak = peak.max(held.len());

            let stats = registry.stats();
            let composite_keys = stats.table("User").map_or(0, |t| t.composite_keys);
            prop_assert!(composite_keys <= peak);
        }
    }

    /// PROPERTY: scalar tables never keep dead entries after the drop hook ran.
    #[test]
    fn property_scalar_entries_are_evicted(ids in proptest::collection::vec(0_i64..8, 1..32)) {
        let registry = registry_with(LOOKUPS[0]);
        for id in &ids {
            let record = money(&registry, *id);
            prop_assert!(registry.contains::<Money>(&Identity::Int(*id)));
            drop(record);
            prop_assert!(!registry.contains::<Money>(&Identity::Int(*id)));
        }
        prop_assert_eq!(registry.table_count(), 0);
    }
}
