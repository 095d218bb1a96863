//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod coordinate;
pub mod orchestrate;

#[cfg(test)]
pub(crate) mod test_support;
