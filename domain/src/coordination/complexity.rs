//! Request complexity and the consultation pattern it selects.
//!
//! ```text
//! complexity = 0.3 * min(requirements / 10, 1)
//!            + 0.3 * risk            (low 0, medium 0.5, high 1)
//!            + 0.2 * min(steps / 15, 1)
//!            + 0.2 * needs_coordination (3+ target domains)
//! ```

use super::intent::{IntentAnalysis, TechnicalPlan};
use crate::consultation::request::ConsultationPattern;

/// Target-domain count at which a request needs cross-domain coordination
pub const COORDINATION_DOMAIN_COUNT: usize = 3;

pub fn complexity_score(
    intent: &IntentAnalysis,
    plan: Option<&TechnicalPlan>,
    target_count: usize,
) -> f64 {
    let requirements = (intent.technical_requirements.len() as f64 / 10.0).min(1.0);
    let steps = plan
        .map(|p| (p.steps.len() as f64 / 15.0).min(1.0))
        .unwrap_or(0.0);
    let coordination = if target_count >= COORDINATION_DOMAIN_COUNT {
        1.0
    } else {
        0.0
    };

    0.3 * requirements + 0.3 * intent.risk_level.complexity_factor() + 0.2 * steps + 0.2 * coordination
}

/// `< 0.3` parallel, `< 0.5` sequential, `< 0.7` hierarchical, else
/// collaborative.
pub fn pattern_for_complexity(score: f64) -> ConsultationPattern {
    if score < 0.3 {
        ConsultationPattern::Parallel
    } else if score < 0.5 {
        ConsultationPattern::Sequential
    } else if score < 0.7 {
        ConsultationPattern::Hierarchical
    } else {
        ConsultationPattern::Collaborative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::intent::{PlanStep, RiskLevel};

    fn intent(requirements: usize, risk: RiskLevel) -> IntentAnalysis {
        IntentAnalysis::new(0.8, risk)
            .with_requirements((0..requirements).map(|i| format!("req {}", i)).collect())
    }

    #[test]
    fn test_simple_request_is_parallel() {
        let score = complexity_score(&intent(2, RiskLevel::Low), None, 1);
        assert!((score - 0.06).abs() < 1e-9);
        assert_eq!(pattern_for_complexity(score), ConsultationPattern::Parallel);
    }

    #[test]
    fn test_saturated_request_is_collaborative() {
        let plan = TechnicalPlan::new(0.7, (0..20).map(|i| PlanStep::new(format!("s{}", i), 5)).collect());
        let score = complexity_score(&intent(12, RiskLevel::High), Some(&plan), 4);
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(pattern_for_complexity(score), ConsultationPattern::Collaborative);
    }

    #[test]
    fn test_pattern_bands() {
        assert_eq!(pattern_for_complexity(0.29), ConsultationPattern::Parallel);
        assert_eq!(pattern_for_complexity(0.3), ConsultationPattern::Sequential);
        assert_eq!(pattern_for_complexity(0.5), ConsultationPattern::Hierarchical);
        assert_eq!(pattern_for_complexity(0.69), ConsultationPattern::Hierarchical);
        assert_eq!(pattern_for_complexity(0.7), ConsultationPattern::Collaborative);
    }

    #[test]
    fn test_medium_risk_with_coordination() {
        // 0.15 risk + 0.2 coordination
        let score = complexity_score(&intent(0, RiskLevel::Medium), None, 3);
        assert_eq!(pattern_for_complexity(score), ConsultationPattern::Sequential);
    }
}
