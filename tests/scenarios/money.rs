//! Scenario: Money and currencies
//!
//! Journey: An application models amounts of money as interned records and
//! wraps them in currencies keyed by the money object.
//!
//! Steps:
//! 1. Ask for `Money(100)` twice
//! 2. Ask for `Money2(100)`, a different type with the same shape
//! 3. Wrap the money in a currency and rename the currency code
//! 4. Let every holder go and ask again
//!
//! Success Criteria:
//! - Equal money is one instance, different types never share one
//! - Currencies follow their money object, not its content
//! - Nothing stays interned once unused

use crate::common::*;
use crate::{assert_distinct, assert_live, assert_same};
use interned_records::{fields, Identity};

/// SCENARIO: Money from 100 twice, then a second money type
#[test]
fn scenario_money_is_interned_per_type() {
    let registry = registry_with(LOOKUPS[0]);

    let a = money(&registry, 100);
    let b = money(&registry, 100);
    assert_same!(a, b);

    let other = money2(&registry, 100);
    assert_ne!(a.object_ref().address(), other.object_ref().address());
    assert_eq!(a.pennies.get(), other.pennies.get());

    assert_eq!(registry.stats().live(), 2);
}

/// SCENARIO: Currency keyed by an interned money object
#[test]
fn scenario_currency_follows_money_object() {
    let registry = registry_with(LOOKUPS[0]);

    let hundred = money(&registry, 100);
    let usd = currency(&registry, "USD", &hundred);
    assert_eq!(usd.identity(), &Identity::from(&hundred));

    // renaming keeps the identity, so the same currency comes back
    assert_same!(usd, usd.with(fields! { code: "EUR" }).unwrap());

    // swapping the money object is forbidden
    assert!(usd.with(fields! { money: money(&registry, 5) }).is_err());

    // the currency keeps its money alive
    drop(hundred);
    assert_live!(registry, Money, 1);
    let inner = usd.money.get().expect("money is set");
    assert_eq!(inner.pennies.get(), Some(&100));
}

/// SCENARIO: Everything drains once unused
#[test]
fn scenario_registry_drains() {
    let registry = registry_with(LOOKUPS[0]);
    {
        let hundred = money(&registry, 100);
        let _usd = currency(&registry, "USD", &hundred);
        let _copy = money2(&registry, 100);
        assert_eq!(registry.table_count(), 3);
    }

    assert_eq!(registry.table_count(), 0);
    assert_eq!(registry.stats().tables.len(), 0);

    let fresh = money(&registry, 100);
    let again = money(&registry, 100);
    assert_distinct!(fresh, money(&registry, 101));
    assert_same!(fresh, again);
}
