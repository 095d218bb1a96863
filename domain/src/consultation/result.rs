//! Outcome of one consultation round.

use super::domain::ExpertDomain;
use super::recommendation::DomainRecommendation;
use super::request::ConsultationPattern;
use crate::core::confidence::has_consensus;
use crate::resolution::ResolvedRecommendation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A domain that did not contribute to the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedConsultation {
    pub domain: ExpertDomain,
    pub reason: String,
    #[serde(default)]
    pub timed_out: bool,
}

impl FailedConsultation {
    pub fn new(domain: ExpertDomain, reason: impl Into<String>) -> Self {
        Self {
            domain,
            reason: reason.into(),
            timed_out: false,
        }
    }

    pub fn timeout(domain: ExpertDomain) -> Self {
        Self {
            domain,
            reason: "deadline exceeded".to_string(),
            timed_out: true,
        }
    }
}

/// Result of one consultation round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationResult {
    pub resolved: ResolvedRecommendation,
    pub pattern: ConsultationPattern,
    /// Domains that returned a recommendation, in priority order
    pub consulted_domains: Vec<ExpertDomain>,
    #[serde(default)]
    pub failed_domains: Vec<FailedConsultation>,
    /// Listed targets the pattern chose not to consult
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_domains: Vec<ExpertDomain>,
    /// Raw per-domain recommendations the resolution was built from
    #[serde(default)]
    pub recommendations: BTreeMap<ExpertDomain, DomainRecommendation>,
    #[serde(default)]
    pub domain_confidences: BTreeMap<ExpertDomain, f64>,
    pub consensus: bool,
    pub duration_ms: u64,
    /// Ids of the expert Brains that were called
    #[serde(default)]
    pub participants: Vec<String>,
    /// Set when the round could not run through the normal pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl ConsultationResult {
    pub fn new(
        pattern: ConsultationPattern,
        recommendations: BTreeMap<ExpertDomain, DomainRecommendation>,
        failed_domains: Vec<FailedConsultation>,
        resolved: ResolvedRecommendation,
        duration_ms: u64,
    ) -> Self {
        let domain_confidences: BTreeMap<ExpertDomain, f64> = recommendations
            .iter()
            .map(|(domain, rec)| (*domain, rec.confidence))
            .collect();
        let confidences: Vec<f64> = domain_confidences.values().copied().collect();

        Self {
            resolved,
            pattern,
            consulted_domains: recommendations.keys().copied().collect(),
            failed_domains,
            skipped_domains: Vec::new(),
            consensus: has_consensus(&confidences),
            domain_confidences,
            recommendations,
            duration_ms,
            participants: Vec::new(),
            fallback_reason: None,
        }
    }

    pub fn with_participants(mut self, participants: Vec<String>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_skipped_domains(mut self, domains: Vec<ExpertDomain>) -> Self {
        self.skipped_domains = domains;
        self
    }

    pub fn with_fallback_reason(mut self, reason: impl Into<String>) -> Self {
        self.fallback_reason = Some(reason.into());
        self
    }

    pub fn is_failed(&self, domain: ExpertDomain) -> bool {
        self.failed_domains.iter().any(|f| f.domain == domain)
    }

    pub fn timed_out_count(&self) -> usize {
        self.failed_domains.iter().filter(|f| f.timed_out).count()
    }
}
