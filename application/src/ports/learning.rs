//! Port for recording round outcomes for later learning.
//!
//! The [`LearningSink::record`] method is synchronous and non-fallible so a
//! broken sink can never disturb a coordination round. Implementations
//! swallow their own errors.

use serde::{Deserialize, Serialize};
use synapse_domain::{ConsultationPattern, CoordinationResult, Decision};

/// Summary of one finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningFeedback {
    pub request: String,
    pub decision: Decision,
    pub confidence: f64,
    pub duration_ms: u64,
    pub participating_brains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ConsultationPattern>,
    #[serde(default)]
    pub timed_out: bool,
}

impl From<&CoordinationResult> for LearningFeedback {
    fn from(result: &CoordinationResult) -> Self {
        Self {
            request: result.request.clone(),
            decision: result.decision,
            confidence: result.confidence,
            duration_ms: result.metadata.duration_ms,
            participating_brains: result.metadata.participating_brains.clone(),
            pattern: result.consultation.as_ref().map(|c| c.pattern),
            timed_out: result.metadata.timed_out,
        }
    }
}

/// Fire-and-forget sink for round outcomes
pub trait LearningSink: Send + Sync {
    fn record(&self, feedback: LearningFeedback);
}

/// No-op implementation for tests and when learning is disabled
pub struct NoLearning;

impl LearningSink for NoLearning {
    fn record(&self, _feedback: LearningFeedback) {}
}
