//! Confidence values are normalized `[0, 1]` belief scores.

/// Smallest score used where a division by the score would otherwise blow up.
pub const CONFIDENCE_EPSILON: f64 = 1e-6;

/// Threshold at which a single confidence counts as "confident".
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Clamp a raw score into `[0, 1]`.
///
/// `NaN` maps to `0.0`.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, `0.0` for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Whether a set of recommendation confidences reaches consensus.
///
/// Fewer than two inputs always agree; otherwise at least half must be
/// [`HIGH_CONFIDENCE`] or above.
pub fn has_consensus(confidences: &[f64]) -> bool {
    if confidences.len() < 2 {
        return true;
    }
    let confident = confidences.iter().filter(|c| **c >= HIGH_CONFIDENCE).count();
    confident * 2 >= confidences.len()
}
