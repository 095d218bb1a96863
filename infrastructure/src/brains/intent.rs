//! Keyword-driven intent analysis.
//!
//! Not natural-language understanding: the request is split into clauses
//! and every clause that mentions a known domain keyword becomes a
//! technical requirement.

use async_trait::async_trait;
use synapse_application::{BrainError, IntentAnalyzer};
use synapse_domain::rules::{DOMAIN_KEYWORD_RULES, derive_targets};
use synapse_domain::util::first_sentence;
use synapse_domain::{DomainPriority, IntentAnalysis, RequestContext, RiskLevel};
use tracing::debug;

/// Terms that make any request high risk
const HIGH_RISK_TERMS: &[&str] = &[
    "production",
    "delete",
    "drop ",
    "migrate",
    "customer data",
    "credential",
    "public",
    "root",
];

/// Confidence when no clause matched a domain keyword
const UNMATCHED_CONFIDENCE: f64 = 0.35;

/// Intent analyzer built on the domain keyword table
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentAnalyzer;

impl KeywordIntentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Clauses mentioning at least one domain keyword
    fn requirements(text: &str) -> Vec<String> {
        text.split(['.', ';', ',', '\n'])
            .flat_map(|sentence| sentence.split(" and "))
            .map(str::trim)
            .filter(|clause| DOMAIN_KEYWORD_RULES.iter().any(|rule| rule.matches(clause)))
            .map(str::to_string)
            .collect()
    }

    fn risk(text: &str, requirements: &[String]) -> RiskLevel {
        let lowered = text.to_lowercase();
        if HIGH_RISK_TERMS.iter().any(|term| lowered.contains(term)) {
            return RiskLevel::High;
        }

        let targets = derive_targets(requirements);
        let critical = targets
            .values()
            .filter(|p| **p == DomainPriority::Critical)
            .count();
        if critical > 0 && targets.len() >= 3 {
            RiskLevel::High
        } else if critical > 0 || targets.values().any(|p| p.is_urgent()) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[async_trait]
impl IntentAnalyzer for KeywordIntentAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        context: Option<&RequestContext>,
    ) -> Result<IntentAnalysis, BrainError> {
        if text.trim().is_empty() {
            return Err(BrainError::Failed("request text is empty".to_string()));
        }

        let mut requirements = Self::requirements(text);
        if let Some(context) = context
            && let Some(environment) = &context.environment
        {
            requirements.push(format!("Target environment: {}", environment));
        }

        let matched = requirements
            .iter()
            .filter(|r| !derive_targets(std::slice::from_ref(*r)).is_empty())
            .count();
        let confidence = if matched == 0 {
            UNMATCHED_CONFIDENCE
        } else {
            (0.5 + 0.1 * matched as f64).min(0.95)
        };
        let risk = Self::risk(text, &requirements);

        debug!(
            requirements = requirements.len(),
            confidence,
            risk = risk.as_str(),
            "Keyword intent analysis"
        );

        Ok(IntentAnalysis::new(confidence, risk)
            .with_requirements(requirements)
            .with_summary(first_sentence(text, 160)))
    }
}
