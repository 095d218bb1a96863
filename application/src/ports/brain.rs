//! Brain ports
//!
//! One async trait per Brain role. Implementations (adapters) live in the
//! infrastructure layer or are supplied by the embedding application.

use async_trait::async_trait;
use std::collections::BTreeSet;
use synapse_domain::{
    DomainQuery, DomainRecommendation, ExpertDomain, IntentAnalysis, RequestContext,
    TechnicalPlan,
};
use thiserror::Error;

/// Errors that can occur when calling a Brain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrainError {
    #[error("Brain unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Brain call failed: {0}")]
    Failed(String),
}

impl BrainError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrainError::Timeout(_))
    }
}

/// Interprets a free-text request
#[async_trait]
pub trait IntentAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        text: &str,
        context: Option<&RequestContext>,
    ) -> Result<IntentAnalysis, BrainError>;

    /// Liveness check used by the registry
    async fn health_check(&self) -> Result<(), BrainError> {
        Ok(())
    }
}

/// Turns an analyzed intent into ordered steps
#[async_trait]
pub trait TechnicalPlanner: Send + Sync {
    async fn plan(
        &self,
        intent: &IntentAnalysis,
        context: Option<&RequestContext>,
    ) -> Result<TechnicalPlan, BrainError>;

    async fn health_check(&self) -> Result<(), BrainError> {
        Ok(())
    }
}

/// Gives scoped recommendations for the domains it serves
#[async_trait]
pub trait DomainExpert: Send + Sync {
    /// Domains this expert can answer for
    fn domains(&self) -> BTreeSet<ExpertDomain>;

    fn capabilities(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    async fn provide(&self, query: &DomainQuery) -> Result<DomainRecommendation, BrainError>;

    async fn health_check(&self) -> Result<(), BrainError> {
        Ok(())
    }
}
