//! Policy composition
//!
//! Translates a profile into ordered constraint clauses. Religion-specific
//! behaviour lives in a lookup table ([`religion::rules_for`]) so adding a
//! religion never touches the composer.

mod composer;
mod fragment;
pub mod religion;

pub use composer::{Policy, TaskParams, compose};
pub use fragment::{Clause, ClauseSource, ConstraintFragment, Rule};
