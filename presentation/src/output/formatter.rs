//! Output formatter trait

use synapse_domain::CoordinationResult;

/// Trait for formatting coordination results
pub trait OutputFormatter {
    /// Format every phase of the result
    fn format(&self, result: &CoordinationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &CoordinationResult) -> String;

    /// Format the decision only (concise output)
    fn format_summary(&self, result: &CoordinationResult) -> String;
}
