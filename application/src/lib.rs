//! Application layer for synapse
//!
//! This crate contains use cases, port definitions, the Brain registry and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CoordinatorConfig, OrchestratorConfig};
pub use ports::{
    brain::{BrainError, DomainExpert, IntentAnalyzer, TechnicalPlanner},
    learning::{LearningFeedback, LearningSink, NoLearning},
    progress::{CoordinationProgress, NoProgress},
};
pub use registry::{BrainHandle, BrainInstance, BrainRegistry, HealthReport, RegistryError};
pub use use_cases::coordinate::{Coordinator, CoordinatorStatus};
pub use use_cases::orchestrate::{OrchestrationError, Orchestrator};
