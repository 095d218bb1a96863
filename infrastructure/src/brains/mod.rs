//! Heuristic Brain adapters
//!
//! Keyword- and profile-driven implementations of the Brain ports, enough
//! to run the coordinator end to end without a model backend:
//!
//! - [`KeywordIntentAnalyzer`]: requirements and risk from keyword rules
//! - [`OutlinePlanner`]: one step per requirement plus a verification step
//! - [`ProfileExpert`]: a static recommendation per domain

mod expert;
mod intent;
mod planner;
mod profiles;

pub use expert::ProfileExpert;
pub use intent::KeywordIntentAnalyzer;
pub use planner::OutlinePlanner;

use crate::config::{ConfigValidationError, FileConfig};
use std::sync::Arc;
use synapse_application::{BrainInstance, BrainRegistry, RegistryError};
use synapse_domain::BrainRole;
use thiserror::Error;
use tracing::info;

/// Id of the registered keyword intent analyzer
pub const INTENT_BRAIN_ID: &str = "keyword-intent";

/// Id of the registered outline planner
pub const PLANNER_BRAIN_ID: &str = "outline-planner";

#[derive(Debug, Error)]
pub enum BrainSetupError {
    #[error("invalid expert profile: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("registration failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Register the heuristic Brains selected by `config`.
///
/// Without `[[experts]]` entries the built-in profile of every domain is
/// used. Returns the registered ids.
pub async fn register_configured_brains(
    registry: &BrainRegistry,
    config: &FileConfig,
) -> Result<Vec<String>, BrainSetupError> {
    let mut ids = Vec::new();

    if config.brains.intent {
        registry
            .register(
                INTENT_BRAIN_ID,
                BrainRole::Intent,
                BrainInstance::Intent(Arc::new(KeywordIntentAnalyzer::new())),
                Vec::new(),
                Vec::new(),
            )
            .await?;
        ids.push(INTENT_BRAIN_ID.to_string());
    }

    if config.brains.planner {
        registry
            .register(
                PLANNER_BRAIN_ID,
                BrainRole::TechnicalPlanner,
                BrainInstance::Planner(Arc::new(OutlinePlanner::new())),
                Vec::new(),
                Vec::new(),
            )
            .await?;
        ids.push(PLANNER_BRAIN_ID.to_string());
    }

    let experts = if config.experts.is_empty() {
        ProfileExpert::defaults()
    } else {
        config
            .experts
            .iter()
            .map(ProfileExpert::from_config)
            .collect::<Result<Vec<_>, _>>()?
    };

    for expert in experts {
        let id = expert.id().to_string();
        let domains = expert.served_domains().clone();
        let capabilities = expert.capability_names();
        registry
            .register(
                id.clone(),
                BrainRole::DomainExpert,
                BrainInstance::Expert(Arc::new(expert)),
                capabilities,
                domains,
            )
            .await?;
        ids.push(id);
    }

    info!(count = ids.len(), "Registered heuristic brains");
    Ok(ids)
}
