//! Brain descriptors: the registry's view of a participating component.

pub mod entities;

pub use entities::{BrainDescriptor, BrainRole, BrainStatus};
