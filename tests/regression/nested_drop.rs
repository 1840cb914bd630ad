//! Regression tests for records dropped while the registry is working.
//!
//! REGRESSION: a table emptied during a build lost the record stored after it
//!
//! Bug: a build function that interned and dropped a temporary record of
//! the same type emptied the table, which was then dropped. The record the
//! outer call stored afterwards went into a table nobody looked at again.
//!
//! Root cause: the store step reused the table handle taken before the
//! build instead of looking the table up again.

use crate::common::*;
use crate::{assert_live, assert_same};
use interned_records::{fields, Handle, Identity, Record};

/// REGRESSION: store after a nested drop emptied the table
#[test]
fn regression_store_after_table_was_dropped_during_build() {
    let registry = registry_with(LOOKUPS[0]);

    let outer: Handle<Money> = registry
        .from_closure(Identity::Int(1), || {
            let scratch = money(&registry, 2);
            drop(scratch);
            Money::create(fields! { pennies: 1 })
        })
        .unwrap();

    assert_live!(registry, Money, 1);
    assert!(registry.contains::<Money>(&Identity::Int(1)));
    assert_same!(outer, money(&registry, 1));
}

/// REGRESSION: releasing a record that holds the last handle of another
#[test]
fn regression_chained_release() {
    let registry = registry_with(LOOKUPS[0]);
    let usd = currency(&registry, "USD", &money(&registry, 100));
    assert_live!(registry, Money, 1);

    drop(usd);

    assert_live!(registry, Currency, 0);
    assert_live!(registry, Money, 0);
    assert_eq!(registry.table_count(), 0);
}

/// REGRESSION: the same identity interned inside its own build
///
/// The inner call wins, the outer call must hand back the inner instance
/// rather than overwrite it.
#[test]
fn regression_same_identity_interned_during_build() {
    let registry = registry_with(LOOKUPS[0]);
    let mut inner = None;

    let outer: Handle<Money> = registry
        .from_closure(Identity::Int(7), || {
            inner = Some(money(&registry, 7));
            Money::create(fields! { pennies: 7 })
        })
        .unwrap();

    let inner = inner.expect("build ran");
    assert_same!(outer, inner);
    assert_live!(registry, Money, 1);
}
