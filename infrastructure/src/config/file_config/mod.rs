//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Values are kept raw (strings, milliseconds) and checked by
//! [`FileConfig::validate`] before being converted to application types.

mod brains;
mod coordinator;
mod learning;
mod orchestrator;

pub use brains::{FileBrainsConfig, FileExpertConfig};
pub use coordinator::FileCoordinatorConfig;
pub use learning::FileLearningConfig;
pub use orchestrator::FileOrchestratorConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use synapse_application::{CoordinatorConfig, OrchestratorConfig};
use synapse_domain::{
    ConfidenceWeights, ConsultationPattern, DecisionThresholds, EffortLevel, ExpertDomain,
};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("escalation_threshold {escalation} exceeds approval_threshold {approval}")]
    ThresholdOrder { escalation: f64, approval: f64 },

    #[error("{0} cannot be 0")]
    ZeroDuration(&'static str),

    #[error("unknown consultation pattern: {0}")]
    UnknownPattern(String),

    #[error("expert id cannot be empty")]
    EmptyExpertId,

    #[error("expert '{0}' is declared more than once")]
    DuplicateExpert(String),

    #[error("expert '{0}' must declare at least one domain")]
    ExpertWithoutDomains(String),

    #[error("expert '{id}' declares unknown domain '{value}'")]
    UnknownDomain { id: String, value: String },

    #[error("expert '{id}' confidence must be within [0, 1], got {value}")]
    InvalidConfidence { id: String, value: f64 },

    #[error("expert '{id}' has unknown effort '{value}'")]
    InvalidEffort { id: String, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Thresholds and deadlines of a coordination round
    pub coordinator: FileCoordinatorConfig,
    /// Consultation defaults
    pub orchestrator: FileOrchestratorConfig,
    /// JSONL learning log
    pub learning: FileLearningConfig,
    /// Which heuristic Brains to register
    pub brains: FileBrainsConfig,
    /// Static expert profiles
    pub experts: Vec<FileExpertConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let c = &self.coordinator;
        for (name, value) in [
            ("intent_min_confidence", c.intent_min_confidence),
            ("consultation_threshold", c.consultation_threshold),
            ("approval_threshold", c.approval_threshold),
            ("escalation_threshold", c.escalation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold { name, value });
            }
        }
        if c.escalation_threshold > c.approval_threshold {
            return Err(ConfigValidationError::ThresholdOrder {
                escalation: c.escalation_threshold,
                approval: c.approval_threshold,
            });
        }

        for (name, value) in [
            ("coordinator.intent_timeout_ms", c.intent_timeout_ms),
            ("coordinator.planning_timeout_ms", c.planning_timeout_ms),
            ("coordinator.consultation_budget_ms", c.consultation_budget_ms),
            ("coordinator.round_budget_ms", c.round_budget_ms),
            ("orchestrator.default_budget_ms", self.orchestrator.default_budget_ms),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroDuration(name));
            }
        }
        self.parse_pattern()?;

        let mut seen = BTreeSet::new();
        for expert in &self.experts {
            if expert.id.trim().is_empty() {
                return Err(ConfigValidationError::EmptyExpertId);
            }
            if !seen.insert(expert.id.as_str()) {
                return Err(ConfigValidationError::DuplicateExpert(expert.id.clone()));
            }
            parse_expert_domains(expert)?;
            if !(0.0..=1.0).contains(&expert.confidence) {
                return Err(ConfigValidationError::InvalidConfidence {
                    id: expert.id.clone(),
                    value: expert.confidence,
                });
            }
            parse_effort(expert)?;
        }
        Ok(())
    }

    /// Parse the optional `[coordinator] pattern`
    pub fn parse_pattern(&self) -> Result<Option<ConsultationPattern>, ConfigValidationError> {
        self.coordinator
            .pattern
            .as_deref()
            .map(|name| {
                name.parse::<ConsultationPattern>()
                    .map_err(|_| ConfigValidationError::UnknownPattern(name.to_string()))
            })
            .transpose()
    }

    /// Validate and convert to the application's coordinator settings
    pub fn to_coordinator_config(&self) -> Result<CoordinatorConfig, ConfigValidationError> {
        self.validate()?;
        let c = &self.coordinator;
        Ok(CoordinatorConfig {
            thresholds: DecisionThresholds {
                intent_min_confidence: c.intent_min_confidence,
                consultation: c.consultation_threshold,
                approval: c.approval_threshold,
                escalation: c.escalation_threshold,
            },
            weights: ConfidenceWeights::default(),
            intent_timeout: Duration::from_millis(c.intent_timeout_ms),
            planning_timeout: Duration::from_millis(c.planning_timeout_ms),
            consultation_budget: Duration::from_millis(c.consultation_budget_ms),
            round_budget: Duration::from_millis(c.round_budget_ms),
            pattern_override: self.parse_pattern()?,
        })
    }

    /// Validate and convert to the application's orchestrator settings
    pub fn to_orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigValidationError> {
        self.validate()?;
        let o = &self.orchestrator;
        Ok(OrchestratorConfig::default()
            .with_default_budget(Duration::from_millis(o.default_budget_ms))
            .with_collaboration_rounds(o.collaboration_rounds)
            .with_history_limit(o.history_limit))
    }
}

/// Parse an expert's domain names
pub fn parse_expert_domains(
    expert: &FileExpertConfig,
) -> Result<BTreeSet<ExpertDomain>, ConfigValidationError> {
    if expert.domains.is_empty() {
        return Err(ConfigValidationError::ExpertWithoutDomains(expert.id.clone()));
    }
    expert
        .domains
        .iter()
        .map(|name| {
            name.parse::<ExpertDomain>()
                .map_err(|_| ConfigValidationError::UnknownDomain {
                    id: expert.id.clone(),
                    value: name.clone(),
                })
        })
        .collect()
}

/// Parse an expert's effort level, `medium` when absent
pub fn parse_effort(expert: &FileExpertConfig) -> Result<EffortLevel, ConfigValidationError> {
    match &expert.effort {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigValidationError::InvalidEffort {
                id: expert.id.clone(),
                value: value.clone(),
            }),
        None => Ok(EffortLevel::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[coordinator]
approval_threshold = 0.8
round_budget_ms = 5000
pattern = "collaborative"

[orchestrator]
collaboration_rounds = 3

[learning]
enabled = true
path = "/tmp/synapse.jsonl"

[brains]
planner = false

[[experts]]
id = "sec"
domains = ["security", "network"]
confidence = 0.9
description = "Use mutual TLS."
steps = ["Issue certificates"]
effort = "high"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.coordinator.approval_threshold, 0.8);
        assert_eq!(config.coordinator.escalation_threshold, 0.4);
        assert_eq!(config.orchestrator.collaboration_rounds, 3);
        assert!(config.learning.enabled);
        assert!(config.brains.intent);
        assert!(!config.brains.planner);
        assert_eq!(config.experts.len(), 1);
        assert_eq!(config.experts[0].domains, vec!["security", "network"]);
        assert!(config.validate().is_ok());

        let coordinator = config.to_coordinator_config().unwrap();
        assert_eq!(coordinator.thresholds.approval, 0.8);
        assert_eq!(coordinator.round_budget, Duration::from_secs(5));
        assert_eq!(
            coordinator.pattern_override,
            Some(ConsultationPattern::Collaborative)
        );

        let orchestrator = config.to_orchestrator_config().unwrap();
        assert_eq!(orchestrator.collaboration_rounds, 3);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.experts.is_empty());
        assert!(!config.learning.enabled);

        let coordinator = config.to_coordinator_config().unwrap();
        assert_eq!(coordinator, CoordinatorConfig::default());
    }

    #[test]
    fn test_threshold_order_is_checked() {
        let mut config = FileConfig::default();
        config.coordinator.escalation_threshold = 0.9;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ThresholdOrder {
                escalation: 0.9,
                approval: 0.75
            })
        );

        config.coordinator.escalation_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidThreshold {
                name: "escalation_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut config = FileConfig::default();
        config.coordinator.round_budget_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroDuration("coordinator.round_budget_ms"))
        );
    }

    #[test]
    fn test_unknown_pattern_is_rejected() {
        let mut config = FileConfig::default();
        config.coordinator.pattern = Some("round-robin".to_string());
        assert!(matches!(
            config.to_coordinator_config(),
            Err(ConfigValidationError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_expert_validation() {
        let expert = FileExpertConfig {
            id: "net".to_string(),
            domains: vec!["network".to_string()],
            confidence: 0.8,
            ..FileExpertConfig::default()
        };

        let mut config = FileConfig {
            experts: vec![expert.clone(), expert.clone()],
            ..FileConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DuplicateExpert("net".to_string()))
        );

        config.experts = vec![FileExpertConfig {
            domains: vec!["weather".to_string()],
            ..expert.clone()
        }];
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownDomain { .. })
        ));

        config.experts = vec![FileExpertConfig {
            domains: Vec::new(),
            ..expert.clone()
        }];
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ExpertWithoutDomains("net".to_string()))
        );

        config.experts = vec![FileExpertConfig {
            effort: Some("huge".to_string()),
            ..expert.clone()
        }];
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidEffort { .. })
        ));

        config.experts = vec![FileExpertConfig {
            confidence: 1.2,
            ..expert
        }];
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidConfidence { .. })
        ));
    }
}
