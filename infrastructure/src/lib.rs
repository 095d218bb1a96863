//! Infrastructure layer for synapse
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL learning log
//! and heuristic Brains.

pub mod brains;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use brains::{
    BrainSetupError, KeywordIntentAnalyzer, OutlinePlanner, ProfileExpert,
    register_configured_brains,
};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlLearningLog;
