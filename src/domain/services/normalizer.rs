//! Identity normalizer
//!
//! Scalar and object identities are already usable as lookup keys. Composite
//! identities are compared by content, so each distinct live composite gets
//! a small stable integer from an [`IdentityRemap`]. Integers released by
//! dead records go to a freelist and are handed out again before the table
//! grows.

use std::collections::HashMap;

use crate::config::CompositeLookup;
use crate::domain::value_objects::{Fields, Identity, Key, Shape};

/// Content of a composite identity, in key form
pub(crate) type Content = Vec<(String, Key)>;

pub(crate) fn content_of(fields: &Fields) -> Content {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), Key::of_value(value)))
        .collect()
}

/// The remap ran out of integer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Exhausted {
    pub(crate) limit: u32,
}

/// Composite content to stable integer, per record type
#[derive(Debug)]
pub(crate) struct IdentityRemap {
    slots: Vec<Option<Content>>,
    free: Vec<u32>,
    index: Option<HashMap<Content, u32>>,
    limit: u32,
    live: usize,
}

impl IdentityRemap {
    pub(crate) fn new(lookup: CompositeLookup, limit: u32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: match lookup {
                CompositeLookup::Linear => None,
                CompositeLookup::Indexed => Some(HashMap::new()),
            },
            limit,
            live: 0,
        }
    }

    /// Existing integer for `content`, without allocating
    pub(crate) fn find(&self, content: &Content) -> Option<u32> {
        if let Some(index) = &self.index {
            return index.get(content).copied();
        }
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(content))
            .and_then(|pos| u32::try_from(pos).ok())
    }

    /// Integer for `content`, allocating one on a miss.
    ///
    /// Returns the key and whether it was freshly allocated.
    pub(crate) fn intern(&mut self, content: Content) -> Result<(u32, bool), Exhausted> {
        if let Some(key) = self.find(&content) {
            return Ok((key, false));
        }

        let key = match self.free.pop() {
            Some(key) => key,
            None => {
                let next = u32::try_from(self.slots.len()).map_err(|_| Exhausted {
                    limit: self.limit,
                })?;
                if next >= self.limit {
                    return Err(Exhausted { limit: self.limit });
                }
                self.slots.push(None);
                next
            }
        };

        if let Some(index) = &mut self.index {
            index.insert(content.clone(), key);
        }
        self.slots[key as usize] = Some(content);
        self.live += 1;
        Ok((key, true))
    }

    /// Return `key` to the freelist. Returns false if it was not in use.
    pub(crate) fn release(&mut self, key: u32) -> bool {
        let Some(slot) = self.slots.get_mut(key as usize) else {
            return false;
        };
        let Some(content) = slot.take() else {
            return false;
        };
        if let Some(index) = &mut self.index {
            index.remove(&content);
        }
        self.free.push(key);
        self.live -= 1;
        true
    }

    /// Number of composite identities currently mapped
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }
}

/// Lookup key for `identity` without allocating.
///
/// `None` for a composite identity the remap does not know.
pub(crate) fn existing_key(identity: &Identity, remap: Option<&IdentityRemap>) -> Option<Key> {
    match identity.shape() {
        Shape::Direct(key) => Some(key),
        Shape::Composite(fields) => remap?.find(&content_of(fields)).map(Key::Composite),
    }
}

/// Lookup key for `identity`, allocating a composite integer on a miss.
///
/// Returns the key and whether a composite integer was freshly allocated.
pub(crate) fn normalize(
    identity: &Identity,
    remap: &mut Option<IdentityRemap>,
    lookup: CompositeLookup,
    limit: u32,
) -> Result<(Key, bool), Exhausted> {
    match identity.shape() {
        Shape::Direct(key) => Ok((key, false)),
        Shape::Composite(fields) => {
            let remap = remap.get_or_insert_with(|| IdentityRemap::new(lookup, limit));
            let (slot, fresh) = remap.intern(content_of(fields))?;
            Ok((Key::Composite(slot), fresh))
        }
    }
}
