//! Final decision, thresholds and the weighted confidence breakdown.

use super::intent::RiskLevel;
use crate::aggregation::AggregatedConfidence;
use crate::consultation::domain::ExpertDomain;
use crate::core::confidence::{clamp_confidence, mean};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a coordination round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
    RequiresReview,
    Escalated,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "APPROVED",
            Decision::Rejected => "REJECTED",
            Decision::RequiresReview => "REQUIRES_REVIEW",
            Decision::Escalated => "ESCALATED",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slack for floating-point error when comparing against a threshold
pub const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Confidence thresholds gating the pipeline.
///
/// Must satisfy `escalation <= approval` and every value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Below this the intent phase aborts
    pub intent_min_confidence: f64,
    /// Intent confidence needed before experts are consulted
    pub consultation: f64,
    /// Inclusive approval threshold
    pub approval: f64,
    /// Below this the request is rejected
    pub escalation: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            intent_min_confidence: 0.3,
            consultation: 0.5,
            approval: 0.75,
            escalation: 0.4,
        }
    }
}

impl DecisionThresholds {
    pub fn validate(&self) -> Result<(), DomainError> {
        let named = [
            ("intent_min_confidence", self.intent_min_confidence),
            ("consultation", self.consultation),
            ("approval", self.approval),
            ("escalation", self.escalation),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::Validation(format!(
                    "threshold {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.escalation > self.approval {
            return Err(DomainError::Validation(format!(
                "escalation threshold {} exceeds approval threshold {}",
                self.escalation, self.approval
            )));
        }
        Ok(())
    }

    /// Map a final confidence to a decision.
    ///
    /// Comparisons allow [`THRESHOLD_TOLERANCE`] of float error.
    pub fn decide(&self, confidence: f64, risk: RiskLevel) -> Decision {
        if confidence + THRESHOLD_TOLERANCE >= self.approval {
            Decision::Approved
        } else if confidence + THRESHOLD_TOLERANCE < self.escalation {
            Decision::Rejected
        } else if risk == RiskLevel::High {
            Decision::Escalated
        } else {
            Decision::RequiresReview
        }
    }
}

/// Fixed weights of the phase confidences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub intent: f64,
    pub planning: f64,
    /// Shared equally among consulted domains
    pub consultation: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            intent: 0.4,
            planning: 0.3,
            consultation: 0.3,
        }
    }
}

/// How the final confidence was assembled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub intent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning: Option<f64>,
    #[serde(default)]
    pub domains: BTreeMap<ExpertDomain, f64>,
    /// Weighted total
    pub total: f64,
    /// Generic aggregation over the same components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<AggregatedConfidence>,
}

impl ConfidenceBreakdown {
    pub fn compute(
        intent: f64,
        planning: Option<f64>,
        domains: BTreeMap<ExpertDomain, f64>,
        weights: &ConfidenceWeights,
    ) -> Self {
        let intent = clamp_confidence(intent);
        let planning = planning.map(clamp_confidence);
        let domain_values: Vec<f64> = domains.values().copied().map(clamp_confidence).collect();

        let mut total = weights.intent * intent + weights.planning * planning.unwrap_or(0.0);
        if !domain_values.is_empty() {
            total += weights.consultation * mean(&domain_values);
        }

        Self {
            intent,
            planning,
            domains,
            total: clamp_confidence(total),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: AggregatedConfidence) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}
