//! Orchestrator parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Consultation defaults used by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Budget for a consultation round when the caller does not set one.
    pub default_budget: Duration,
    /// Collaboration rounds after the initial parallel round.
    pub collaboration_rounds: usize,
    /// Recent consultation summaries kept for sequential context.
    pub history_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_budget: Duration::from_secs(30),
            collaboration_rounds: 2,
            history_limit: 20,
        }
    }
}

impl OrchestratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_budget(mut self, budget: Duration) -> Self {
        self.default_budget = budget;
        self
    }

    pub fn with_collaboration_rounds(mut self, rounds: usize) -> Self {
        self.collaboration_rounds = rounds;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
