//! Domain layer for synapse
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and
//! nothing in it performs I/O or waits on time.
//!
//! # Core Concepts
//!
//! ## Brains
//!
//! A Brain is an independent component that contributes to a decision:
//!
//! - **Intent**: interprets the request and rates its risk
//! - **Technical planner**: turns the request into ordered steps
//! - **Domain expert**: gives a scoped recommendation for one or more
//!   [`ExpertDomain`]s
//!
//! ## Consultation
//!
//! A [`ConsultationRequest`] asks a set of target domains for advice using
//! one of five [`ConsultationPattern`]s. The per-domain answers are merged by
//! the [`ConflictResolver`] into exactly one [`ResolvedRecommendation`].
//!
//! ## Coordination
//!
//! A coordination round runs intent → planning → consultation →
//! aggregation → decision → execution planning and ends in a
//! [`CoordinationResult`] with a [`Decision`].

pub mod aggregation;
pub mod brain;
pub mod consultation;
pub mod coordination;
pub mod core;
pub mod resolution;
pub mod rules;
pub mod util;

// Re-export commonly used types
pub use aggregation::{
    AggregatedConfidence, AggregationContext, AggregationMethod, ConfidenceAggregator,
    ConfidenceScore, ConsensusQuality,
};
pub use brain::{BrainDescriptor, BrainRole, BrainStatus};
pub use consultation::{
    ConsultationPattern, ConsultationRequest, ConsultationResult, DomainPriority, DomainQuery,
    DomainRecommendation, EffortLevel, ExpertDomain, FailedConsultation, QueryContext,
};
pub use coordination::{
    ConfidenceBreakdown, ConfidenceWeights, CoordinationPhase, CoordinationResult, Decision,
    DecisionThresholds, ExecutionPlan, ExecutionStep, IntentAnalysis, PhaseOutcome, PhaseReport,
    PhaseTiming, PlanStep, RequestContext, RiskAssessment, RiskLevel, RoundMetadata, StepSource,
    TechnicalPlan,
};
pub use core::{confidence::clamp_confidence, error::DomainError};
pub use resolution::{
    ConflictKind, ConflictRecord, ConflictResolver, ImpactLevel, ResolutionError,
    ResolutionPhase, ResolutionStrategy, ResolvedRecommendation,
};
