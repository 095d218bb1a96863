//! Logging infrastructure: the JSONL learning log.
//!
//! Provides [`JsonlLearningLog`], a JSONL file writer that implements the
//! [`LearningSink`](synapse_application::LearningSink) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlLearningLog;
