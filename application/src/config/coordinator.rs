//! Coordinator parameters: decision thresholds, confidence weights and
//! per-phase deadlines.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use synapse_domain::{ConfidenceWeights, ConsultationPattern, DecisionThresholds, DomainError};

/// Coordinator configuration.
///
/// | Deadline | Applies to |
/// |----------|------------|
/// | `intent_timeout` | the intent Brain call |
/// | `planning_timeout` | the planning Brain call |
/// | `consultation_budget` | the whole consultation round |
/// | `round_budget` | the whole coordination round (wall clock) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    pub thresholds: DecisionThresholds,
    pub weights: ConfidenceWeights,
    pub intent_timeout: Duration,
    pub planning_timeout: Duration,
    pub consultation_budget: Duration,
    pub round_budget: Duration,
    /// Skip complexity scoring and always use this pattern.
    pub pattern_override: Option<ConsultationPattern>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            thresholds: DecisionThresholds::default(),
            weights: ConfidenceWeights::default(),
            intent_timeout: Duration::from_secs(10),
            planning_timeout: Duration::from_secs(10),
            consultation_budget: Duration::from_secs(30),
            round_budget: Duration::from_secs(60),
            pattern_override: None,
        }
    }
}

impl CoordinatorConfig {
    // ==================== Builder Methods ====================

    pub fn with_thresholds(mut self, thresholds: DecisionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_intent_timeout(mut self, timeout: Duration) -> Self {
        self.intent_timeout = timeout;
        self
    }

    pub fn with_planning_timeout(mut self, timeout: Duration) -> Self {
        self.planning_timeout = timeout;
        self
    }

    pub fn with_consultation_budget(mut self, budget: Duration) -> Self {
        self.consultation_budget = budget;
        self
    }

    pub fn with_round_budget(mut self, budget: Duration) -> Self {
        self.round_budget = budget;
        self
    }

    pub fn with_pattern_override(mut self, pattern: Option<ConsultationPattern>) -> Self {
        self.pattern_override = pattern;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.thresholds.validate()?;
        let budgets = [
            ("intent_timeout", self.intent_timeout),
            ("planning_timeout", self.planning_timeout),
            ("consultation_budget", self.consultation_budget),
            ("round_budget", self.round_budget),
        ];
        for (name, value) in budgets {
            if value.is_zero() {
                return Err(DomainError::Validation(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }
}
