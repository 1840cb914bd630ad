//! Interning contracts (INTERN-001 through INTERN-004)
//!
//! One live instance per record type and identity.

use std::cell::Cell;

use crate::common::*;
use crate::{assert_distinct, assert_live, assert_same};
use interned_records::{fields, Handle, Identity, Record};

/// CONTRACT INTERN-001: Equal arguments, same instance
mod same_arguments {
    use super::*;

    #[test]
    fn contract_scalar_identity_interns() {
        let registry = registry_with(LOOKUPS[0]);
        let a = money(&registry, 100);
        let b = money(&registry, 100);

        assert_same!(a, b);
        assert_live!(registry, Money, 1);
    }

    #[test]
    fn contract_composite_identity_interns() {
        for lookup in LOOKUPS {
            let registry = registry_with(lookup);
            let a = user(&registry, "bob", 23, "a@x");
            let b = user(&registry, "bob", 23, "a@x");

            assert_same!(a, b);
            assert_eq!(registry.composite_key_count::<User>(), 1);
        }
    }

    #[test]
    fn contract_float_signed_zero_is_one_identity() {
        let registry = registry_with(LOOKUPS[0]);
        let build = |identity: f64| -> Handle<Money> {
            registry
                .from_closure(Identity::Float(identity), || {
                    Money::create(fields! { pennies: 0 })
                })
                .unwrap()
        };

        assert_same!(build(0.0), build(-0.0));
    }
}

/// CONTRACT INTERN-002: Different arguments, different instances
mod different_arguments {
    use super::*;

    #[test]
    fn contract_different_scalars_differ() {
        let registry = registry_with(LOOKUPS[0]);
        assert_distinct!(money(&registry, 100), money(&registry, 101));
    }

    #[test]
    fn contract_composites_differ_by_any_entry() {
        for lookup in LOOKUPS {
            let registry = registry_with(lookup);
            let a = user(&registry, "bob", 23, "a@x");
            let b = user(&registry, "bob", 23, "b@x");
            let c = user(&registry, "bob", 24, "a@x");

            assert_distinct!(a, b);
            assert_distinct!(a, c);
            assert_distinct!(b, c);
            assert_live!(registry, User, 3);
        }
    }
}

/// CONTRACT INTERN-003: Type isolation
///
/// Numerically equal identities of different record types never share an
/// instance.
mod type_isolation {
    use super::*;

    #[test]
    fn contract_equal_identities_of_different_types_are_isolated() {
        let registry = registry_with(LOOKUPS[0]);
        let a = money(&registry, 100);
        let b = money2(&registry, 100);

        assert_ne!(a.object_ref().address(), b.object_ref().address());
        assert_live!(registry, Money, 1);
        assert_live!(registry, Money2, 1);
        assert_eq!(registry.table_count(), 2);
    }

    #[test]
    fn contract_composite_key_never_matches_scalar_key() {
        let registry = registry_with(LOOKUPS[0]);
        // the first composite of a type gets integer key 0
        let composite: Handle<Money> = registry
            .from_closure(Identity::Composite(fields! { pennies: 0 }), || {
                Money::create(fields! { pennies: 0 })
            })
            .unwrap();
        let scalar = money(&registry, 0);

        assert_distinct!(composite, scalar);
    }
}

/// CONTRACT INTERN-004: A cache hit never builds
mod hits_skip_build {
    use super::*;

    #[test]
    fn contract_build_runs_once_per_live_identity() {
        let registry = registry_with(LOOKUPS[0]);
        let builds = Cell::new(0);

        let a = counted_money(&registry, 5, &builds);
        let b = counted_money(&registry, 5, &builds);
        let c = counted_money(&registry, 6, &builds);

        assert_same!(a, b);
        assert_distinct!(a, c);
        assert_eq!(builds.get(), 2);
    }
}
