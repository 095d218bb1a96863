//! Static-profile domain experts.

use super::profiles::default_profile;
use crate::config::{ConfigValidationError, FileExpertConfig, parse_effort, parse_expert_domains};
use async_trait::async_trait;
use std::collections::BTreeSet;
use synapse_application::{BrainError, DomainExpert};
use synapse_domain::{DomainQuery, DomainRecommendation, EffortLevel, ExpertDomain};

/// Expert that answers every query with a configured recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileExpert {
    id: String,
    domains: BTreeSet<ExpertDomain>,
    capabilities: BTreeSet<String>,
    confidence: f64,
    description: String,
    steps: Vec<String>,
    risks: Vec<String>,
    dependencies: Vec<String>,
    resources: Vec<String>,
    effort: EffortLevel,
}

impl ProfileExpert {
    /// Build from a `[[experts]]` entry
    pub fn from_config(config: &FileExpertConfig) -> Result<Self, ConfigValidationError> {
        let domains = parse_expert_domains(config)?;
        if !(0.0..=1.0).contains(&config.confidence) {
            return Err(ConfigValidationError::InvalidConfidence {
                id: config.id.clone(),
                value: config.confidence,
            });
        }
        Ok(Self {
            id: config.id.clone(),
            domains,
            capabilities: config.capabilities.iter().cloned().collect(),
            confidence: config.confidence,
            description: config.description.clone(),
            steps: config.steps.clone(),
            risks: config.risks.clone(),
            dependencies: config.dependencies.clone(),
            resources: config.resources.clone(),
            effort: parse_effort(config)?,
        })
    }

    /// Built-in profile for one domain, with id `<domain>-expert`
    pub fn default_for(domain: ExpertDomain) -> Self {
        let profile = default_profile(domain);
        Self {
            id: format!("{}-expert", domain),
            domains: [domain].into_iter().collect(),
            capabilities: profile.capabilities.iter().map(|c| c.to_string()).collect(),
            confidence: profile.confidence,
            description: profile.description.to_string(),
            steps: to_strings(profile.steps),
            risks: to_strings(profile.risks),
            dependencies: to_strings(profile.dependencies),
            resources: to_strings(profile.resources),
            effort: profile.effort,
        }
    }

    /// One built-in expert per domain
    pub fn defaults() -> Vec<Self> {
        ExpertDomain::ALL.into_iter().map(Self::default_for).collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn served_domains(&self) -> &BTreeSet<ExpertDomain> {
        &self.domains
    }

    pub fn capability_names(&self) -> Vec<String> {
        self.capabilities.iter().cloned().collect()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl DomainExpert for ProfileExpert {
    fn domains(&self) -> BTreeSet<ExpertDomain> {
        self.domains.clone()
    }

    fn capabilities(&self) -> BTreeSet<String> {
        self.capabilities.clone()
    }

    async fn provide(&self, query: &DomainQuery) -> Result<DomainRecommendation, BrainError> {
        if !self.domains.contains(&query.domain) {
            return Err(BrainError::Unavailable(format!(
                "{} does not serve {}",
                self.id, query.domain
            )));
        }

        Ok(
            DomainRecommendation::new(query.domain, self.confidence, self.description.clone())
                .with_steps(self.steps.clone())
                .with_risks(self.risks.clone())
                .with_dependencies(self.dependencies.clone())
                .with_resources(self.resources.clone())
                .with_effort(self.effort),
        )
    }
}
