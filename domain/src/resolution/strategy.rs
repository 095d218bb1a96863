//! Resolution strategies and the merged recommendation they produce.

use super::conflict::ConflictRecord;
use crate::consultation::domain::ExpertDomain;
use crate::consultation::recommendation::DomainRecommendation;
use serde::{Deserialize, Serialize};

/// Confidence of the synthetic recommendation used when nothing was gathered
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// How a set of conflicting recommendations was merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Keep the highest-priority domain's answer
    DomainPriority,
    /// Keep the answer carrying the fewest risks
    RiskMinimization,
    /// Keep the most confident answer
    HighestConfidence,
    /// Address contradictory domains in sequential phases
    Hybrid,
    /// Union all answers into one
    ConsensusBuilding,
    /// Synthetic low-confidence answer, nothing was gathered
    Fallback,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::DomainPriority => "domain_priority",
            ResolutionStrategy::RiskMinimization => "risk_minimization",
            ResolutionStrategy::HighestConfidence => "highest_confidence",
            ResolutionStrategy::Hybrid => "hybrid",
            ResolutionStrategy::ConsensusBuilding => "consensus_building",
            ResolutionStrategy::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One phase of a hybrid resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPhase {
    /// 1-based
    pub order: usize,
    pub domain: ExpertDomain,
    pub description: String,
    pub steps: Vec<String>,
}

/// The single merged answer of a consultation round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecommendation {
    pub primary: DomainRecommendation,
    #[serde(default)]
    pub alternatives: Vec<DomainRecommendation>,
    pub strategy: ResolutionStrategy,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub risk_mitigations: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<ConflictRecord>,
    /// Only populated by [`ResolutionStrategy::Hybrid`]
    #[serde(default)]
    pub phases: Vec<ResolutionPhase>,
}

impl ResolvedRecommendation {
    /// Synthetic recommendation for a round where no expert answered.
    ///
    /// `domain` is the domain the answer is attributed to, normally the
    /// highest-priority target. `alternatives` keeps anything gathered
    /// outside the resolver.
    pub fn fallback(
        domain: ExpertDomain,
        reason: impl Into<String>,
        alternatives: Vec<DomainRecommendation>,
    ) -> Self {
        let reason = reason.into();
        let primary = DomainRecommendation::new(
            domain,
            FALLBACK_CONFIDENCE,
            format!("No merged expert recommendation is available: {}", reason),
        )
        .with_risks(vec![reason.clone()]);

        Self {
            primary,
            alternatives,
            strategy: ResolutionStrategy::Fallback,
            confidence: FALLBACK_CONFIDENCE,
            reasoning: format!("Fallback recommendation ({})", reason),
            risk_mitigations: vec!["Review the request manually".to_string()],
            conflicts: Vec::new(),
            phases: Vec::new(),
        }
    }

    /// Resolved without any detected conflict
    pub fn is_harmonious(&self) -> bool {
        self.strategy == ResolutionStrategy::ConsensusBuilding && self.conflicts.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.strategy == ResolutionStrategy::Fallback
    }
}
