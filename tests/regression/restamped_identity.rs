//! Regression tests for drafts stamped with a foreign identity.
//!
//! REGRESSION: a restamped record never left its table
//!
//! Bug: a build that returned `Draft::stamped` with an identity other than
//! the one it was looked up under produced a record whose death removed
//! nothing. The dead entry kept the table alive and, for composite
//! identities, the key never went back to the freelist.
//!
//! Root cause: the drop hook recomputed the table key from the stamped
//! identity instead of releasing the key the entry was stored under.

use crate::assert_live;
use crate::common::*;
use interned_records::{fields, Draft, Handle, Identity, Record, Registry, RegistryConfig};

/// REGRESSION: restamped composites release their key on drop
#[test]
fn regression_restamped_composites_do_not_exhaust_keys() {
    let registry = Registry::with_config(RegistryConfig {
        composite_key_limit: 1,
        ..RegistryConfig::default()
    });

    for id in 0..4i64 {
        let args = fields! { name: "bob", id: id, email: "a@x" };
        let user: Handle<User> = registry
            .from_closure(User::derive_identity(&args).unwrap(), || {
                let value = User::create(args)?;
                Ok(Draft::stamped(value, Identity::Str("bob".into())))
            })
            .unwrap();
        assert_eq!(user.identity(), &Identity::Str("bob".into()));
        drop(user);

        assert_eq!(registry.composite_key_count::<User>(), 0);
        assert_eq!(registry.table_count(), 0);
    }
}

/// REGRESSION: restamped scalars are evicted on drop
#[test]
fn regression_restamped_scalars_are_evicted() {
    let registry = Registry::new();
    let money: Handle<Money> = registry
        .from_closure(Identity::Int(7), || {
            let value = Money::create(fields! { pennies: 7 })?;
            Ok(Draft::stamped(value, Identity::Float(7.0)))
        })
        .unwrap();

    assert_live!(registry, Money, 1);
    drop(money);
    assert_eq!(registry.stats().table("Money"), None);
    assert_eq!(registry.table_count(), 0);
}
