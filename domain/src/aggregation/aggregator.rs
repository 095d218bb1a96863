//! Confidence aggregator.
//!
//! When no method is requested one is picked from the population variance
//! of the clamped scores:
//!
//! - variance < 0.01: weighted average
//! - variance < 0.05: harmonic mean
//! - otherwise: consensus (mean penalized by disagreement)
//!
//! Geometric mean, minimum and maximum are only used when requested.

use super::score::{
    AggregatedConfidence, AggregationContext, AggregationMethod, ConfidenceScore,
    ConsensusQuality,
};
use crate::core::confidence::{CONFIDENCE_EPSILON, clamp_confidence, mean, variance};

/// Largest penalty the consensus method subtracts from the mean
const MAX_DISAGREEMENT_PENALTY: f64 = 0.3;

/// Pure, deterministic confidence aggregator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceAggregator;

impl ConfidenceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Combine `scores` into one confidence. Never fails: zero inputs give
    /// `0.0`.
    pub fn aggregate(
        &self,
        scores: &[ConfidenceScore],
        method: Option<AggregationMethod>,
        context: Option<&AggregationContext>,
    ) -> AggregatedConfidence {
        let values: Vec<f64> = scores.iter().map(|s| clamp_confidence(s.score)).collect();
        let variance = variance(&values);
        let consensus = ConsensusQuality::from_variance(variance);

        if values.is_empty() {
            let method = method.unwrap_or_default();
            return AggregatedConfidence {
                value: 0.0,
                method,
                variance: 0.0,
                consensus_level: 1.0,
                consensus,
                source_count: 0,
                reasoning: reasoning(method, consensus, 0, context),
            };
        }

        let method = method.unwrap_or_else(|| Self::select_method(variance));
        let value = match method {
            AggregationMethod::WeightedAverage => {
                let weights: Vec<f64> = scores.iter().map(|s| s.weight).collect();
                weighted_average(&values, &weights)
            }
            AggregationMethod::HarmonicMean => harmonic_mean(&values),
            AggregationMethod::GeometricMean => geometric_mean(&values),
            AggregationMethod::Consensus => {
                (mean(&values) - (2.0 * variance).min(MAX_DISAGREEMENT_PENALTY)).max(0.0)
            }
            AggregationMethod::Minimum => values.iter().copied().fold(1.0, f64::min),
            AggregationMethod::Maximum => values.iter().copied().fold(0.0, f64::max),
        };

        AggregatedConfidence {
            value: clamp_confidence(value),
            method,
            variance,
            consensus_level: (1.0 - 4.0 * variance).clamp(0.0, 1.0),
            consensus,
            source_count: values.len(),
            reasoning: reasoning(method, consensus, values.len(), context),
        }
    }

    /// Method picked for a given population variance
    pub fn select_method(variance: f64) -> AggregationMethod {
        if variance < 0.01 {
            AggregationMethod::WeightedAverage
        } else if variance < 0.05 {
            AggregationMethod::HarmonicMean
        } else {
            AggregationMethod::Consensus
        }
    }
}

/// Negative or non-finite weights count as 0.
fn usable_weight(weight: f64) -> f64 {
    if weight.is_finite() { weight.max(0.0) } else { 0.0 }
}

fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().copied().map(usable_weight).sum();
    if total <= 0.0 {
        return mean(values);
    }
    values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * usable_weight(*w))
        .sum::<f64>()
        / total
}

/// All inputs at (or below) the epsilon floor
fn all_zero(values: &[f64]) -> bool {
    values.iter().all(|v| *v <= CONFIDENCE_EPSILON)
}

fn harmonic_mean(values: &[f64]) -> f64 {
    if all_zero(values) {
        return 0.0;
    }
    let denominator: f64 = values.iter().map(|v| 1.0 / v.max(CONFIDENCE_EPSILON)).sum();
    values.len() as f64 / denominator
}

fn geometric_mean(values: &[f64]) -> f64 {
    if all_zero(values) {
        return 0.0;
    }
    let logs: Vec<f64> = values.iter().map(|v| v.max(CONFIDENCE_EPSILON).ln()).collect();
    mean(&logs).exp()
}

fn reasoning(
    method: AggregationMethod,
    consensus: ConsensusQuality,
    count: usize,
    context: Option<&AggregationContext>,
) -> String {
    let mut text = format!(
        "Aggregated {} score(s) using {} with {} consensus",
        count,
        method,
        consensus.as_str()
    );
    if let Some(context) = context
        && !context.subject.is_empty()
    {
        text.push_str(&format!(" for {}", context.subject));
    }
    text
}
