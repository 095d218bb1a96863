//! Presentation layer for synapse
//!
//! This crate contains the CLI definition, output formatters, and progress
//! reporters.

pub mod cli;
pub mod output;
pub mod progress;

pub use cli::commands::{Cli, OutputFormat, PatternArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
