//! Consultation requests and the per-domain queries derived from them.

use super::domain::{DomainPriority, ExpertDomain};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Concurrency/ordering strategy used to query experts in one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationPattern {
    /// All domains at once under one shared deadline
    #[default]
    Parallel,
    /// One at a time, in influence order, each seeing earlier answers
    Sequential,
    /// Priority tiers, each tier in parallel
    Hierarchical,
    /// Urgent domains first, then whatever their answers trigger
    Conditional,
    /// Repeated rounds sharing insights between related domains
    Collaborative,
}

impl ConsultationPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationPattern::Parallel => "parallel",
            ConsultationPattern::Sequential => "sequential",
            ConsultationPattern::Hierarchical => "hierarchical",
            ConsultationPattern::Conditional => "conditional",
            ConsultationPattern::Collaborative => "collaborative",
        }
    }
}

impl std::fmt::Display for ConsultationPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsultationPattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(ConsultationPattern::Parallel),
            "sequential" => Ok(ConsultationPattern::Sequential),
            "hierarchical" => Ok(ConsultationPattern::Hierarchical),
            "conditional" => Ok(ConsultationPattern::Conditional),
            "collaborative" => Ok(ConsultationPattern::Collaborative),
            other => Err(DomainError::UnknownPattern(other.to_string())),
        }
    }
}

/// An immutable request to consult a set of expert domains.
///
/// Validation happens on construction so that a malformed request is
/// rejected before any Brain is queried.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use std::time::Duration;
/// use synapse_domain::{ConsultationPattern, ConsultationRequest, DomainPriority, ExpertDomain};
///
/// let mut targets = BTreeMap::new();
/// targets.insert(ExpertDomain::Security, DomainPriority::Critical);
///
/// let request = ConsultationRequest::new(
///     "Expose the billing API publicly",
///     ConsultationPattern::Parallel,
///     targets,
///     Duration::from_secs(5),
/// )
/// .unwrap();
/// assert_eq!(request.priority_of(ExpertDomain::Security), DomainPriority::Critical);
///
/// assert!(ConsultationRequest::new(
///     "anything",
///     ConsultationPattern::Parallel,
///     BTreeMap::new(),
///     Duration::from_secs(5),
/// )
/// .is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationRequest {
    query: String,
    pattern: ConsultationPattern,
    targets: BTreeMap<ExpertDomain, DomainPriority>,
    budget: Duration,
    consensus_required: bool,
}

impl ConsultationRequest {
    pub fn new(
        query: impl Into<String>,
        pattern: ConsultationPattern,
        targets: BTreeMap<ExpertDomain, DomainPriority>,
        budget: Duration,
    ) -> Result<Self, DomainError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(DomainError::Validation(
                "consultation query cannot be empty".to_string(),
            ));
        }
        if targets.is_empty() {
            return Err(DomainError::Validation(
                "target-domain set cannot be empty".to_string(),
            ));
        }
        if budget.is_zero() {
            return Err(DomainError::Validation(
                "consultation time budget must be positive".to_string(),
            ));
        }

        Ok(Self {
            query,
            pattern,
            targets,
            budget,
            consensus_required: false,
        })
    }

    pub fn with_consensus_required(mut self, required: bool) -> Self {
        self.consensus_required = required;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pattern(&self) -> ConsultationPattern {
        self.pattern
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn consensus_required(&self) -> bool {
        self.consensus_required
    }

    pub fn targets(&self) -> &BTreeMap<ExpertDomain, DomainPriority> {
        &self.targets
    }

    /// Target domains in priority-table order
    pub fn target_domains(&self) -> Vec<ExpertDomain> {
        self.targets.keys().copied().collect()
    }

    pub fn is_target(&self, domain: ExpertDomain) -> bool {
        self.targets.contains_key(&domain)
    }

    /// Priority of a domain in this request (`Medium` for non-targets)
    pub fn priority_of(&self, domain: ExpertDomain) -> DomainPriority {
        self.targets.get(&domain).copied().unwrap_or_default()
    }

    /// Build the query sent to one domain's expert
    pub fn query_for(&self, domain: ExpertDomain, context: QueryContext) -> DomainQuery {
        DomainQuery {
            query: self.query.clone(),
            domain,
            priority: self.priority_of(domain),
            context,
        }
    }
}

/// Enrichment carried alongside a domain query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Key points extracted from answers earlier in the round
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Most recent consultation-history entries
    #[serde(default)]
    pub history: Vec<String>,
    /// Insights shared by related domains
    #[serde(default)]
    pub shared_insights: BTreeMap<ExpertDomain, String>,
    /// Collaboration round (0 for the initial round)
    #[serde(default)]
    pub round: usize,
}

impl QueryContext {
    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty() && self.history.is_empty() && self.shared_insights.is_empty()
    }
}

/// The query one domain expert receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainQuery {
    pub query: String,
    pub domain: ExpertDomain,
    pub priority: DomainPriority,
    pub context: QueryContext,
}
