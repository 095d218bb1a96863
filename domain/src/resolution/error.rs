use crate::consultation::domain::ExpertDomain;
use thiserror::Error;

/// Conflict resolution failures. Always fatal for the round.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("No recommendations to resolve")]
    Empty,

    #[error("Recommendation from {domain} has invalid confidence {value}")]
    InvalidConfidence { domain: ExpertDomain, value: f64 },

    #[error("Recommendation keyed under {key} claims domain {actual}")]
    DomainMismatch {
        key: ExpertDomain,
        actual: ExpertDomain,
    },

    #[error("Strategy {0} found no candidate recommendation")]
    NoCandidate(&'static str),
}
