//! Coordinator configuration from TOML (`[coordinator]` section)
//!
//! ```toml
//! [coordinator]
//! intent_min_confidence = 0.3
//! consultation_threshold = 0.5
//! approval_threshold = 0.75
//! escalation_threshold = 0.4
//! intent_timeout_ms = 10000
//! planning_timeout_ms = 10000
//! consultation_budget_ms = 30000
//! round_budget_ms = 60000
//! pattern = "hierarchical"   # optional, skips complexity scoring
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoordinatorConfig {
    pub intent_min_confidence: f64,
    pub consultation_threshold: f64,
    pub approval_threshold: f64,
    pub escalation_threshold: f64,
    pub intent_timeout_ms: u64,
    pub planning_timeout_ms: u64,
    pub consultation_budget_ms: u64,
    pub round_budget_ms: u64,
    /// Fixed consultation pattern name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Default for FileCoordinatorConfig {
    fn default() -> Self {
        Self {
            intent_min_confidence: 0.3,
            consultation_threshold: 0.5,
            approval_threshold: 0.75,
            escalation_threshold: 0.4,
            intent_timeout_ms: 10_000,
            planning_timeout_ms: 10_000,
            consultation_budget_ms: 30_000,
            round_budget_ms: 60_000,
            pattern: None,
        }
    }
}
