//! Coordination phases and their explicit outcomes.

use serde::{Deserialize, Serialize};

/// The six phases of a coordination round, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationPhase {
    Intent,
    Planning,
    Consultation,
    Aggregation,
    Decision,
    ExecutionPlanning,
}

impl CoordinationPhase {
    pub const ALL: [CoordinationPhase; 6] = [
        CoordinationPhase::Intent,
        CoordinationPhase::Planning,
        CoordinationPhase::Consultation,
        CoordinationPhase::Aggregation,
        CoordinationPhase::Decision,
        CoordinationPhase::ExecutionPlanning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinationPhase::Intent => "intent",
            CoordinationPhase::Planning => "planning",
            CoordinationPhase::Consultation => "consultation",
            CoordinationPhase::Aggregation => "aggregation",
            CoordinationPhase::Decision => "decision",
            CoordinationPhase::ExecutionPlanning => "execution_planning",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> usize {
        *self as usize + 1
    }
}

impl std::fmt::Display for CoordinationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseOutcome {
    Success,
    /// Degraded but the round continues
    Partial,
    /// The round stops here
    Abort,
}

impl PhaseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseOutcome::Success => "success",
            PhaseOutcome::Partial => "partial",
            PhaseOutcome::Abort => "abort",
        }
    }
}

/// What a phase hands to the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport<T> {
    pub outcome: PhaseOutcome,
    pub value: Option<T>,
    pub detail: Option<String>,
}

impl<T> PhaseReport<T> {
    pub fn success(value: T) -> Self {
        Self {
            outcome: PhaseOutcome::Success,
            value: Some(value),
            detail: None,
        }
    }

    pub fn partial(value: Option<T>, detail: impl Into<String>) -> Self {
        Self {
            outcome: PhaseOutcome::Partial,
            value,
            detail: Some(detail.into()),
        }
    }

    pub fn abort(detail: impl Into<String>) -> Self {
        Self {
            outcome: PhaseOutcome::Abort,
            value: None,
            detail: Some(detail.into()),
        }
    }

    pub fn is_abort(&self) -> bool {
        self.outcome == PhaseOutcome::Abort
    }
}

/// Timing record for one executed phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: CoordinationPhase,
    pub outcome: PhaseOutcome,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
