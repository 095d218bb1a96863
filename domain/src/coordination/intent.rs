//! Inputs produced by the intent and planning Brains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk of acting on a request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Contribution to the complexity score
    pub fn complexity_factor(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => 0.5,
            RiskLevel::High => 1.0,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

/// Structured interpretation of the user's request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub overall_confidence: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Free-form requirement phrases, scanned by the keyword rule table
    #[serde(default)]
    pub technical_requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl IntentAnalysis {
    pub fn new(overall_confidence: f64, risk_level: RiskLevel) -> Self {
        Self {
            overall_confidence,
            risk_level,
            technical_requirements: Vec::new(),
            summary: None,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.technical_requirements = requirements;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// One step of a technical plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub description: String,
    pub duration_minutes: u32,
}

impl PlanStep {
    pub fn new(description: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            description: description.into(),
            duration_minutes,
        }
    }
}

/// Technical plan produced by the planning Brain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalPlan {
    pub confidence: f64,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
    #[serde(default)]
    pub resource_requirements: Vec<String>,
}

impl TechnicalPlan {
    pub fn new(confidence: f64, steps: Vec<PlanStep>) -> Self {
        Self {
            confidence,
            steps,
            resource_requirements: Vec::new(),
        }
    }

    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resource_requirements = resources;
        self
    }

    pub fn total_minutes(&self) -> u32 {
        self.steps.iter().map(|s| s.duration_minutes).sum()
    }
}

/// Caller-supplied context for a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Earlier requests or decisions, most recent last
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
