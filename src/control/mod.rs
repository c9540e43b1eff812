//! Fuzzy decision engine.
//!
//! Leaves first: [`membership`] shapes, [`variable`]s that own labelled
//! terms, the resolved [`rules`], and the [`inference`] engine tying
//! them together.

pub mod inference;
pub mod membership;
pub mod rules;
pub mod variable;
