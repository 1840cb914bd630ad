//! Domain Policies
//!
//! Rules that govern how records may evolve.

mod constraints;

pub use constraints::{Constraints, FieldConstraint};
