//! The record produced by one coordination round.

use super::decision::{ConfidenceBreakdown, Decision};
use super::execution::ExecutionPlan;
use super::intent::{IntentAnalysis, RiskLevel, TechnicalPlan};
use super::phase::PhaseTiming;
use crate::consultation::result::ConsultationResult;
use crate::util::push_unique;
use serde::{Deserialize, Serialize};

/// Upper bound on recommended actions in a result
pub const MAX_RECOMMENDED_ACTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default)]
    pub mitigations: Vec<String>,
}

impl RiskAssessment {
    pub fn new(level: RiskLevel) -> Self {
        Self {
            level,
            factors: Vec::new(),
            mitigations: Vec::new(),
        }
    }

    pub fn add_factor(&mut self, factor: &str) {
        push_unique(&mut self.factors, factor);
    }

    pub fn add_mitigation(&mut self, mitigation: &str) {
        push_unique(&mut self.mitigations, mitigation);
    }
}

/// Timing and participation metadata of a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundMetadata {
    /// Milliseconds since the Unix epoch
    pub started_at: u64,
    pub completed_at: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub phases: Vec<PhaseTiming>,
    #[serde(default)]
    pub participating_brains: Vec<String>,
    #[serde(default)]
    pub timed_out: bool,
}

/// Final, explainable outcome of a coordination round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationResult {
    pub request: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_plan: Option<TechnicalPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation: Option<ConsultationResult>,
    #[serde(default)]
    pub breakdown: ConfidenceBreakdown,
    pub decision: Decision,
    pub confidence: f64,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub risk: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_plan: Option<ExecutionPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: RoundMetadata,
}

impl CoordinationResult {
    /// A REJECTED result carrying only the error, with high risk
    pub fn failure(request: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        let mut risk = RiskAssessment::new(RiskLevel::High);
        risk.add_factor(&error);
        Self {
            request: request.into(),
            intent: None,
            technical_plan: None,
            consultation: None,
            breakdown: ConfidenceBreakdown::default(),
            decision: Decision::Rejected,
            confidence: 0.0,
            recommended_actions: Vec::new(),
            risk,
            execution_plan: None,
            error: Some(error),
            metadata: RoundMetadata::default(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.decision.is_approved()
    }

    /// Same outcome, ignoring timing metadata
    pub fn same_outcome(&self, other: &CoordinationResult) -> bool {
        let strip = |r: &CoordinationResult| {
            let mut r = r.clone();
            r.metadata = RoundMetadata {
                participating_brains: r.metadata.participating_brains.clone(),
                timed_out: r.metadata.timed_out,
                ..RoundMetadata::default()
            };
            if let Some(c) = r.consultation.as_mut() {
                c.duration_ms = 0;
            }
            r
        };
        strip(self) == strip(other)
    }
}

/// Up to [`MAX_RECOMMENDED_ACTIONS`] actions, from the resolved primary's
/// steps when a consultation ran, otherwise from the technical plan.
pub fn recommended_actions(
    consultation: Option<&ConsultationResult>,
    plan: Option<&TechnicalPlan>,
) -> Vec<String> {
    let mut actions = Vec::new();

    if let Some(consultation) = consultation {
        for step in &consultation.resolved.primary.implementation_steps {
            if actions.len() == MAX_RECOMMENDED_ACTIONS {
                return actions;
            }
            push_unique(&mut actions, step);
        }
    }
    if actions.is_empty()
        && let Some(plan) = plan
    {
        for step in &plan.steps {
            if actions.len() == MAX_RECOMMENDED_ACTIONS {
                break;
            }
            push_unique(&mut actions, &step.description);
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::intent::PlanStep;

    #[test]
    fn test_failure_is_rejected_with_high_risk() {
        let result = CoordinationResult::failure("deploy", "no intent brain registered");
        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.risk.level, RiskLevel::High);
        assert_eq!(result.error.as_deref(), Some("no intent brain registered"));
        assert_eq!(result.risk.factors.len(), 1);
    }

    #[test]
    fn test_recommended_actions_capped() {
        let plan = TechnicalPlan::new(
            0.9,
            (0..8).map(|i| PlanStep::new(format!("step {}", i), 5)).collect(),
        );
        let actions = recommended_actions(None, Some(&plan));
        assert_eq!(actions.len(), MAX_RECOMMENDED_ACTIONS);
        assert_eq!(actions[0], "step 0");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut result = CoordinationResult::failure("scale the cluster", "budget exceeded");
        result.metadata.participating_brains = vec!["intent".to_string()];
        let json = serde_json::to_string(&result).unwrap();
        let back: CoordinationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(back.same_outcome(&result));
    }

    #[test]
    fn test_same_outcome_ignores_timing() {
        let a = CoordinationResult::failure("x", "y");
        let mut b = a.clone();
        b.metadata.duration_ms = 42;
        b.metadata.started_at = 7;
        assert!(a.same_outcome(&b));
        b.confidence = 0.5;
        assert!(!a.same_outcome(&b));
    }
}
