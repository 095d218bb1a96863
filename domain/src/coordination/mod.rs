//! Coordination: the six-phase pipeline's value objects.

pub mod complexity;
pub mod decision;
pub mod execution;
pub mod intent;
pub mod phase;
pub mod result;

pub use complexity::{COORDINATION_DOMAIN_COUNT, complexity_score, pattern_for_complexity};
pub use decision::{ConfidenceBreakdown, ConfidenceWeights, Decision, DecisionThresholds};
pub use execution::{ExecutionPlan, ExecutionStep, StepSource};
pub use intent::{IntentAnalysis, PlanStep, RequestContext, RiskLevel, TechnicalPlan};
pub use phase::{CoordinationPhase, PhaseOutcome, PhaseReport, PhaseTiming};
pub use result::{
    CoordinationResult, MAX_RECOMMENDED_ACTIONS, RiskAssessment, RoundMetadata,
    recommended_actions,
};
