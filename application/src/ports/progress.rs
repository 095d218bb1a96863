//! Progress notification port
//!
//! Defines the interface for reporting progress during a coordination round.

use synapse_domain::{CoordinationPhase, Decision, ExpertDomain, PhaseOutcome};

/// Callback for progress updates during a coordination round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain log lines, etc.)
pub trait CoordinationProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: CoordinationPhase);

    /// Called when a phase ends
    fn on_phase_complete(&self, phase: CoordinationPhase, outcome: PhaseOutcome);

    /// Called when an expert is queried for a domain
    fn on_domain_start(&self, _domain: ExpertDomain) {}

    /// Called when a domain answered, failed or timed out
    fn on_domain_complete(&self, _domain: ExpertDomain, _success: bool) {}

    /// Called once the decision is known
    fn on_decision(&self, _decision: Decision, _confidence: f64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CoordinationProgress for NoProgress {
    fn on_phase_start(&self, _phase: CoordinationPhase) {}
    fn on_phase_complete(&self, _phase: CoordinationPhase, _outcome: PhaseOutcome) {}
}
