//! Per-domain recommendations produced by expert Brains.

use super::domain::ExpertDomain;
use crate::core::confidence::clamp_confidence;
use crate::util::first_sentence;
use serde::{Deserialize, Serialize};

/// Number of listed risks at which a recommendation counts as high-risk
pub const HIGH_RISK_COUNT: usize = 3;

/// Effort category of a recommendation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EffortLevel {
    /// Estimated working time for the whole recommendation
    pub fn estimated_minutes(&self) -> u32 {
        match self {
            EffortLevel::Low => 15,
            EffortLevel::Medium => 30,
            EffortLevel::High => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Low => "low",
            EffortLevel::Medium => "medium",
            EffortLevel::High => "high",
        }
    }
}

impl std::str::FromStr for EffortLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(EffortLevel::Low),
            "medium" => Ok(EffortLevel::Medium),
            "high" => Ok(EffortLevel::High),
            other => Err(format!("Unknown effort level: {}", other)),
        }
    }
}

/// A scoped recommendation from one expert domain.
///
/// # Example
///
/// ```
/// use synapse_domain::{DomainRecommendation, EffortLevel, ExpertDomain};
///
/// let rec = DomainRecommendation::new(ExpertDomain::Security, 1.4, "Enable mutual TLS")
///     .with_steps(vec!["Issue certificates".to_string()])
///     .with_effort(EffortLevel::High);
/// assert_eq!(rec.confidence, 1.0); // clamped
/// assert!(!rec.is_high_risk());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecommendation {
    pub domain: ExpertDomain,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    pub description: String,
    /// Ordered implementation steps
    #[serde(default)]
    pub implementation_steps: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub effort: EffortLevel,
    /// Resources the steps need (people, services, budget lines)
    #[serde(default)]
    pub resources: Vec<String>,
}

impl DomainRecommendation {
    pub fn new(domain: ExpertDomain, confidence: f64, description: impl Into<String>) -> Self {
        Self {
            domain,
            confidence: clamp_confidence(confidence),
            description: description.into(),
            implementation_steps: Vec::new(),
            risks: Vec::new(),
            dependencies: Vec::new(),
            effort: EffortLevel::default(),
            resources: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.implementation_steps = steps;
        self
    }

    pub fn with_risks(mut self, risks: Vec<String>) -> Self {
        self.risks = risks;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_effort(mut self, effort: EffortLevel) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resources = resources;
        self
    }

    pub fn is_high_effort(&self) -> bool {
        self.effort == EffortLevel::High
    }

    pub fn is_high_risk(&self) -> bool {
        self.risks.len() >= HIGH_RISK_COUNT
    }

    /// One-line summary used for highlights and shared insights
    pub fn summary(&self) -> String {
        format!("[{}] {}", self.domain, first_sentence(&self.description, 160))
    }

    /// Description plus steps, the text conflict detectors scan
    pub fn searchable_text(&self) -> String {
        let mut text = self.description.clone();
        for step in &self.implementation_steps {
            text.push('\n');
            text.push_str(step);
        }
        text
    }
}
