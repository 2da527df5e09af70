//! Declarative shape contracts for result structures.
//!
//! A [`Schema`] is a closed tree of node kinds (typed leaf, alternatives,
//! fixed mapping, wildcard mapping). Extractors validate every scan result
//! against their schema before handing it to the caller.

mod node;
mod validate;

pub use node::{Field, LeafType, Schema};
pub use validate::{KeyPath, ValidationError, ViolationKind};
