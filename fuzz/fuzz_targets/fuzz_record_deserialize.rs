#![no_main]

use interned_records::{record_fields, Handle, Record, Slot};
use libfuzzer_sys::fuzz_target;

struct Money {
    pennies: Slot<i64>,
}

impl Record for Money {
    record_fields!(pennies);
}

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Records must never come back from serialized data, whatever the input
        assert!(serde_json::from_str::<Handle<Money>>(content).is_err());
    }
});
