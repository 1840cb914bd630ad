//! Write-once record fields

use serde::{Serialize, Serializer};

use crate::domain::value_objects::{FieldValue, Value};
use crate::error::{RecordError, RecordResult};

/// A record field that can be initialized exactly once.
///
/// A fresh slot is uninitialized. The first `init` stores the value; any
/// later `init` fails, so a record never changes after it is built.
#[derive(Debug, PartialEq)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Slot<T> {
    pub const fn new() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: FieldValue> Slot<T> {
    /// Dynamic view of the field, `None` while uninitialized
    pub fn value(&self) -> Option<Value> {
        self.value.clone().map(FieldValue::into_value)
    }

    /// Initialize the slot from a dynamic value
    pub fn init(&mut self, field: &str, value: Value) -> RecordResult<()> {
        if self.value.is_some() {
            return Err(RecordError::AlreadyInitialized {
                field: field.to_string(),
            });
        }
        let typed = T::from_value(&value).ok_or_else(|| RecordError::FieldType {
            field: field.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })?;
        self.value = Some(typed);
        Ok(())
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
