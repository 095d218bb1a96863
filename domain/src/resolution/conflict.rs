//! Conflict records between pairs of domain recommendations.

use crate::consultation::domain::ExpertDomain;
use serde::{Deserialize, Serialize};

/// Kind of disagreement between two recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    /// Opposing terms split across the two descriptions
    Contradictory,
    /// Shared implementation steps
    Overlapping,
    /// Both demand high effort or both carry high risk
    Priority,
    /// Same sub-goal, different named strategies
    Approach,
    /// Shared dependencies
    Dependency,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::Contradictory => "contradictory",
            ConflictKind::Overlapping => "overlapping",
            ConflictKind::Priority => "priority",
            ConflictKind::Approach => "approach",
            ConflictKind::Dependency => "dependency",
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Impact assessment of a conflict
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
        }
    }
}

/// A detected conflict between two domains. Derived and read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// The pair, higher-priority domain first
    pub domains: (ExpertDomain, ExpertDomain),
    pub kind: ConflictKind,
    pub impact: ImpactLevel,
    /// Steps, dependencies, terms or sub-goals the conflict is about
    pub affected_areas: Vec<String>,
    pub description: String,
}

impl ConflictRecord {
    pub fn new(
        first: ExpertDomain,
        second: ExpertDomain,
        kind: ConflictKind,
        impact: ImpactLevel,
        description: impl Into<String>,
    ) -> Self {
        let domains = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            domains,
            kind,
            impact,
            affected_areas: Vec::new(),
            description: description.into(),
        }
    }

    pub fn with_affected_areas(mut self, areas: Vec<String>) -> Self {
        self.affected_areas = areas;
        self
    }

    pub fn involves(&self, domain: ExpertDomain) -> bool {
        self.domains.0 == domain || self.domains.1 == domain
    }

    /// The other side of the pair, if `domain` is part of it
    pub fn counterpart(&self, domain: ExpertDomain) -> Option<ExpertDomain> {
        if self.domains.0 == domain {
            Some(self.domains.1)
        } else if self.domains.1 == domain {
            Some(self.domains.0)
        } else {
            None
        }
    }
}
