//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`OrchestratorConfig`]: consultation defaults (budget, collaboration rounds)
//! - [`CoordinatorConfig`]: thresholds, weights and per-phase deadlines

pub mod coordinator;
pub mod orchestrator;

pub use coordinator::CoordinatorConfig;
pub use orchestrator::OrchestratorConfig;
