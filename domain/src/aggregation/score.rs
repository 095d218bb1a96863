//! Value objects for confidence aggregation.

use crate::core::confidence::clamp_confidence;
use serde::{Deserialize, Serialize};

/// One input to an aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub score: f64,
    pub weight: f64,
    /// Where the score came from (brain id, phase name)
    pub source: String,
}

impl ConfidenceScore {
    /// Score with weight 1.0. The score is clamped.
    pub fn new(score: f64, source: impl Into<String>) -> Self {
        Self {
            score: clamp_confidence(score),
            weight: 1.0,
            source: source.into(),
        }
    }

    /// Negative or non-finite weights become 0.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }
}

/// Algorithm used to combine scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    WeightedAverage,
    HarmonicMean,
    GeometricMean,
    Consensus,
    Minimum,
    Maximum,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::WeightedAverage => "weighted_average",
            AggregationMethod::HarmonicMean => "harmonic_mean",
            AggregationMethod::GeometricMean => "geometric_mean",
            AggregationMethod::Consensus => "consensus",
            AggregationMethod::Minimum => "minimum",
            AggregationMethod::Maximum => "maximum",
        }
    }
}

impl std::fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AggregationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "weighted_average" | "weighted" => Ok(AggregationMethod::WeightedAverage),
            "harmonic_mean" | "harmonic" => Ok(AggregationMethod::HarmonicMean),
            "geometric_mean" | "geometric" => Ok(AggregationMethod::GeometricMean),
            "consensus" => Ok(AggregationMethod::Consensus),
            "minimum" | "min" => Ok(AggregationMethod::Minimum),
            "maximum" | "max" => Ok(AggregationMethod::Maximum),
            other => Err(format!("Unknown aggregation method: {}", other)),
        }
    }
}

/// Qualitative agreement between inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusQuality {
    High,
    Moderate,
    Low,
}

impl ConsensusQuality {
    /// variance < 0.01 is high, < 0.05 moderate, otherwise low
    pub fn from_variance(variance: f64) -> Self {
        if variance < 0.01 {
            ConsensusQuality::High
        } else if variance < 0.05 {
            ConsensusQuality::Moderate
        } else {
            ConsensusQuality::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusQuality::High => "high",
            ConsensusQuality::Moderate => "moderate",
            ConsensusQuality::Low => "low",
        }
    }
}

/// Optional description of what is being aggregated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationContext {
    pub subject: String,
}

impl AggregationContext {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Output of an aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedConfidence {
    pub value: f64,
    pub method: AggregationMethod,
    pub variance: f64,
    /// `clamp(1 - 4 * variance, 0, 1)`
    pub consensus_level: f64,
    pub consensus: ConsensusQuality,
    pub source_count: usize,
    pub reasoning: String,
}
