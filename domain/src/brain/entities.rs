//! Brain entities.

use crate::consultation::domain::ExpertDomain;
use crate::core::error::DomainError;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The role a Brain plays in a coordination round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrainRole {
    Intent,
    TechnicalPlanner,
    DomainExpert,
}

impl BrainRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrainRole::Intent => "intent",
            BrainRole::TechnicalPlanner => "technical_planner",
            BrainRole::DomainExpert => "domain_expert",
        }
    }
}

impl std::fmt::Display for BrainRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a registered Brain.
///
/// Status only advances `Initializing -> {Active, Error}` and
/// `Active -> Error`. There is no way back to `Active`; re-registration is
/// required. `Inactive` marks a deregistered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrainStatus {
    #[default]
    Initializing,
    Active,
    Error,
    Inactive,
}

impl BrainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrainStatus::Initializing => "initializing",
            BrainStatus::Active => "active",
            BrainStatus::Error => "error",
            BrainStatus::Inactive => "inactive",
        }
    }

    pub fn can_transition_to(&self, next: BrainStatus) -> bool {
        matches!(
            (self, next),
            (BrainStatus::Initializing, BrainStatus::Active)
                | (BrainStatus::Initializing, BrainStatus::Error)
                | (BrainStatus::Active, BrainStatus::Error)
                | (_, BrainStatus::Inactive)
        )
    }
}

impl std::fmt::Display for BrainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registry metadata for one Brain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainDescriptor {
    pub id: String,
    pub role: BrainRole,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    #[serde(default)]
    pub domains: BTreeSet<ExpertDomain>,
    pub status: BrainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Milliseconds since the Unix epoch
    pub registered_at: u64,
}

impl BrainDescriptor {
    pub fn new(id: impl Into<String>, role: BrainRole) -> Self {
        Self {
            id: id.into(),
            role,
            capabilities: BTreeSet::new(),
            domains: BTreeSet::new(),
            status: BrainStatus::Initializing,
            last_error: None,
            registered_at: current_timestamp(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = ExpertDomain>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == BrainStatus::Active
    }

    pub fn serves(&self, domain: ExpertDomain) -> bool {
        self.domains.contains(&domain)
    }

    pub fn mark_active(&mut self) -> Result<(), DomainError> {
        self.transition(BrainStatus::Active)?;
        self.last_error = None;
        Ok(())
    }

    pub fn mark_error(&mut self, error: impl Into<String>) -> Result<(), DomainError> {
        self.transition(BrainStatus::Error)?;
        self.last_error = Some(error.into());
        Ok(())
    }

    pub fn mark_inactive(&mut self) {
        self.status = BrainStatus::Inactive;
    }

    fn transition(&mut self, next: BrainStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_advances() {
        let mut brain = BrainDescriptor::new("net-1", BrainRole::DomainExpert)
            .with_domains([ExpertDomain::Network]);
        assert_eq!(brain.status, BrainStatus::Initializing);

        brain.mark_active().unwrap();
        assert!(brain.is_active());

        brain.mark_error("health check failed").unwrap();
        assert_eq!(brain.last_error.as_deref(), Some("health check failed"));

        // no automatic recovery
        assert!(brain.mark_active().is_err());
        assert_eq!(brain.status, BrainStatus::Error);
    }

    #[test]
    fn test_initializing_may_fail_directly() {
        let mut brain = BrainDescriptor::new("intent", BrainRole::Intent);
        brain.mark_error("unreachable").unwrap();
        assert!(!brain.is_active());
    }

    #[test]
    fn test_serves_domain() {
        let brain = BrainDescriptor::new("sec", BrainRole::DomainExpert)
            .with_domains([ExpertDomain::Security, ExpertDomain::Network])
            .with_capabilities(["threat-modeling".to_string()]);
        assert!(brain.serves(ExpertDomain::Network));
        assert!(!brain.serves(ExpertDomain::Storage));
        assert!(brain.capabilities.contains("threat-modeling"));
    }

    #[test]
    fn test_role_names() {
        assert_eq!(BrainRole::TechnicalPlanner.to_string(), "technical_planner");
        let json = serde_json::to_string(&BrainRole::DomainExpert).unwrap();
        assert_eq!(json, "\"domain_expert\"");
    }
}
