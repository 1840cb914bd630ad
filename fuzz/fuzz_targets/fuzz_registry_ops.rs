#![no_main]

use std::collections::HashMap;

use interned_records::{fields, record_fields, Handle, Record, Registry, Slot};
use libfuzzer_sys::fuzz_target;

struct Pair {
    left: Slot<i64>,
    right: Slot<i64>,
}

impl Record for Pair {
    record_fields!(left, right);
}

fuzz_target!(|data: &[u8]| {
    // Each byte creates or drops one pair; the registry must agree with the
    // set of handles held here after every step
    let registry = Registry::new();
    let mut held: HashMap<u8, Handle<Pair>> = HashMap::new();

    for &byte in data {
        let key = byte & 0x3f;
        if byte & 0x80 == 0 {
            let pair: Handle<Pair> = registry
                .from_args(fields! { left: i64::from(key), right: i64::from(key % 7) })
                .expect("pair interns");
            held.insert(key, pair);
        } else {
            held.remove(&key);
        }
        assert_eq!(registry.live_count::<Pair>(), held.len());
        assert_eq!(registry.composite_key_count::<Pair>(), held.len());
    }

    drop(held);
    assert_eq!(registry.table_count(), 0);
});
