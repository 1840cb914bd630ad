//! Named, ordered field lists
//!
//! Used for constructor arguments, `with` overrides and composite identities.

use super::value::{FieldValue, Value};
use crate::error::{RecordError, RecordResult};

/// An ordered list of `(name, value)` pairs with unique names.
///
/// Setting a name that already exists replaces the value in place, so the
/// original position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an existing entry in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Typed lookup; `None` when missing or of another kind
    pub fn get_as<T: FieldValue>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_value)
    }

    /// Look up an argument an identity-deriving function cannot do without
    pub fn require(&self, record: &str, name: &str) -> RecordResult<&Value> {
        self.get(name).ok_or_else(|| RecordError::MissingArgument {
            record: record.to_string(),
            field: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `overrides` onto these entries.
    ///
    /// Every override must name an existing entry; the first one that does
    /// not is returned as the error.
    pub fn merged<'a>(&self, overrides: &'a Fields) -> Result<Fields, &'a str> {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            match merged.entries.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = value.clone(),
                None => return Err(name),
            }
        }
        Ok(merged)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.set(name, value);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`Fields`] list from `name: value` pairs.
///
/// ```
/// use interned_records::fields;
///
/// let args = fields! { name: "bob", id: 23 };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.set(stringify!($name), $value);)+
        fields
    }};
}
