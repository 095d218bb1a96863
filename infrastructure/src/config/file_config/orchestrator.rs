//! Orchestrator configuration from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Budget for consultations that do not specify one
    pub default_budget_ms: u64,
    /// Rounds after the initial one in the collaborative pattern
    pub collaboration_rounds: usize,
    /// Summaries of earlier rounds kept for sequential consultations
    pub history_limit: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            default_budget_ms: 30_000,
            collaboration_rounds: 2,
            history_limit: 20,
        }
    }
}
