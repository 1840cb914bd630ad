//! Domain Entities
//!
//! Records with identity and lifecycle, and the write-once fields they are
//! made of.

mod record;
mod slot;

pub(crate) use record::Interned;
pub use record::{unknown_property, Draft, Handle, Record};
pub use slot::Slot;
