//! Record evolution (`with`)
//!
//! Produces a new interned record from an existing one plus field
//! overrides. The original is never touched; when the overrides resolve to
//! the original identity the registry hands back the same instance.

use tracing::trace;

use super::registry::Registry;
use crate::domain::entities::{unknown_property, Draft, Handle, Record};
use crate::domain::value_objects::{Fields, Identity};
use crate::error::RecordResult;

pub(crate) fn evolve<R: Record>(
    registry: &Registry,
    original: &Handle<R>,
    overrides: Fields,
) -> RecordResult<Handle<R>> {
    let declared = |name: &&str| R::FIELDS.iter().any(|field| field == name);
    if let Some(name) = overrides.names().find(|name| !declared(name)) {
        return Err(unknown_property::<R>(name));
    }

    let identity = next_identity(original, &overrides)?;

    let changing: Vec<&str> = overrides.names().collect();
    R::constraints().check(&changing)?;

    trace!(record = R::name(), from = %original.identity(), to = %identity, "evolving record");

    let stamp = identity.clone();
    registry.from_closure(identity, move || {
        let mut value = R::shell();
        for (name, field) in overrides.iter() {
            value.init_field(name, field.clone())?;
        }
        // uninitialized fields of the original stay uninitialized
        for &name in R::FIELDS {
            if overrides.contains(name) {
                continue;
            }
            if let Some(field) = original.field(name) {
                value.init_field(name, field)?;
            }
        }
        Ok(Draft::stamped(value, stamp))
    })
}

/// Identity of the evolved record.
///
/// A composite identity is overlaid entry by entry. Any other identity is
/// derived again from the original's initialized fields with the overrides
/// applied on top.
fn next_identity<R: Record>(original: &Handle<R>, overrides: &Fields) -> RecordResult<Identity> {
    if let Some(current) = original.identity().as_composite() {
        let merged = current.merged(overrides).map_err(unknown_property::<R>)?;
        return R::derive_identity(&merged);
    }

    let mut inputs: Fields = R::FIELDS
        .iter()
        .filter_map(|&name| original.field(name).map(|value| (name, value)))
        .collect();
    for (name, value) in overrides.iter() {
        inputs.set(name, value.clone());
    }
    R::derive_identity(&inputs)
}
