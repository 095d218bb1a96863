//! Core domain concepts shared across all subdomains.
//!
//! - [`confidence`]: clamping and summary statistics for `[0, 1]` scores
//! - [`error::DomainError`]: domain-level errors

pub mod confidence;
pub mod error;
