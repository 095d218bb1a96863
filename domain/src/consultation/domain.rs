//! Expert domains and per-request domain priorities.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Operational domain an expert Brain is specialized in.
///
/// The declaration order *is* the fixed domain-priority table:
/// security > network > storage > orchestration > external services >
/// monitoring. `Ord` follows it, so ordered maps keyed by `ExpertDomain`
/// iterate from the highest-priority domain down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertDomain {
    Security,
    Network,
    Storage,
    Orchestration,
    ExternalServices,
    Monitoring,
}

impl ExpertDomain {
    /// Every domain, highest priority first
    pub const ALL: [ExpertDomain; 6] = [
        ExpertDomain::Security,
        ExpertDomain::Network,
        ExpertDomain::Storage,
        ExpertDomain::Orchestration,
        ExpertDomain::ExternalServices,
        ExpertDomain::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertDomain::Security => "security",
            ExpertDomain::Network => "network",
            ExpertDomain::Storage => "storage",
            ExpertDomain::Orchestration => "orchestration",
            ExpertDomain::ExternalServices => "external_services",
            ExpertDomain::Monitoring => "monitoring",
        }
    }

    /// Position in the priority table (0 = highest)
    pub fn priority_rank(&self) -> usize {
        *self as usize
    }

    /// Fixed priority score used to break scheduling ties (higher wins)
    pub fn priority_score(&self) -> f64 {
        1.0 - self.priority_rank() as f64 * 0.1
    }
}

impl std::fmt::Display for ExpertDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExpertDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "security" => Ok(ExpertDomain::Security),
            "network" | "networking" => Ok(ExpertDomain::Network),
            "storage" => Ok(ExpertDomain::Storage),
            "orchestration" => Ok(ExpertDomain::Orchestration),
            "external_services" | "external" => Ok(ExpertDomain::ExternalServices),
            "monitoring" => Ok(ExpertDomain::Monitoring),
            other => Err(DomainError::UnknownDomain(other.to_string())),
        }
    }
}

/// Priority of a target domain within one consultation request.
///
/// Ordered from most to least urgent, so `min()` picks the most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DomainPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl DomainPriority {
    /// Tiers in consultation order
    pub const TIERS: [DomainPriority; 4] = [
        DomainPriority::Critical,
        DomainPriority::High,
        DomainPriority::Medium,
        DomainPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainPriority::Critical => "critical",
            DomainPriority::High => "high",
            DomainPriority::Medium => "medium",
            DomainPriority::Low => "low",
        }
    }

    /// Critical and High domains are consulted first by conditional rounds
    pub fn is_urgent(&self) -> bool {
        matches!(self, DomainPriority::Critical | DomainPriority::High)
    }
}

impl std::fmt::Display for DomainPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
