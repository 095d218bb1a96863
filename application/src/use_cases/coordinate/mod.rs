//! Coordinate use case
//!
//! Runs one coordination round through six phases:
//!
//! ```text
//! intent ──► planning ──► consultation ──► aggregation ──► decision ──► execution plan
//!   │ abort      (best effort)   (confident intents)                   (approved only)
//!   ▼
//! REJECTED
//! ```
//!
//! [`Coordinator::submit`] never returns an error. Brain failures, panics,
//! an exceeded round budget and shutdown all end in a [`CoordinationResult`]
//! whose `error` and risk assessment explain what happened.

mod phases;

use crate::config::{CoordinatorConfig, OrchestratorConfig};
use crate::ports::learning::{LearningFeedback, LearningSink, NoLearning};
use crate::ports::progress::{CoordinationProgress, NoProgress};
use crate::registry::BrainRegistry;
use crate::use_cases::orchestrate::Orchestrator;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use synapse_domain::util::current_timestamp;
use synapse_domain::{
    ConfidenceAggregator, ConfidenceBreakdown, ConsultationResult, CoordinationPhase,
    CoordinationResult, Decision, DecisionThresholds, ExecutionPlan, IntentAnalysis, PhaseReport,
    PhaseTiming, RequestContext, RiskAssessment, RiskLevel, RoundMetadata, TechnicalPlan,
    coordination::recommended_actions,
};
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Snapshot returned by [`Coordinator::status`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatorStatus {
    pub active_rounds: usize,
    pub thresholds: DecisionThresholds,
    pub registered_brain_ids: Vec<String>,
    pub shut_down: bool,
}

/// Work completed so far in one round
#[derive(Debug, Default)]
pub(crate) struct RoundState {
    intent: Option<IntentAnalysis>,
    plan: Option<TechnicalPlan>,
    consultation: Option<ConsultationResult>,
    breakdown: Option<ConfidenceBreakdown>,
    decision: Option<Decision>,
    execution_plan: Option<ExecutionPlan>,
    timings: Vec<PhaseTiming>,
    participants: BTreeSet<String>,
    /// Why the round stopped early
    abort: Option<String>,
}

fn lock(state: &Mutex<RoundState>) -> MutexGuard<'_, RoundState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How the round future ended
enum RoundEnd {
    Completed,
    TimedOut,
    Cancelled,
    Panicked(String),
}

/// Keeps `active_rounds` accurate even when a round is dropped mid-flight
struct ActiveRound<'a>(&'a AtomicUsize);

impl<'a> ActiveRound<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveRound<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Entry point of the system: turns a request into a decision
pub struct Coordinator {
    registry: Arc<BrainRegistry>,
    orchestrator: Orchestrator,
    aggregator: ConfidenceAggregator,
    config: CoordinatorConfig,
    learning: Arc<dyn LearningSink>,
    active_rounds: AtomicUsize,
    cancellation: CancellationToken,
}

impl Coordinator {
    pub fn new(registry: Arc<BrainRegistry>) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&registry)),
            registry,
            aggregator: ConfidenceAggregator::new(),
            config: CoordinatorConfig::default(),
            learning: Arc::new(NoLearning),
            active_rounds: AtomicUsize::new(0),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_orchestrator_config(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = Orchestrator::new(Arc::clone(&self.registry)).with_config(config);
        self
    }

    pub fn with_learning(mut self, learning: Arc<dyn LearningSink>) -> Self {
        self.learning = learning;
        self
    }

    /// Share a cancellation token, e.g. one tied to ctrl-c
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BrainRegistry> {
        &self.registry
    }

    pub fn status(&self) -> CoordinatorStatus {
        CoordinatorStatus {
            active_rounds: self.active_rounds.load(Ordering::SeqCst),
            thresholds: self.config.thresholds,
            registered_brain_ids: self.registry.ids(),
            shut_down: self.cancellation.is_cancelled(),
        }
    }

    /// Cancel in-flight rounds and refuse new ones
    pub fn shutdown(&self) {
        info!(
            active_rounds = self.active_rounds.load(Ordering::SeqCst),
            "Coordinator shutting down"
        );
        self.cancellation.cancel();
    }

    /// Execute the use case with default (no-op) progress
    pub async fn submit(&self, text: &str, context: Option<RequestContext>) -> CoordinationResult {
        self.submit_with_progress(text, context, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn submit_with_progress(
        &self,
        text: &str,
        context: Option<RequestContext>,
        progress: &dyn CoordinationProgress,
    ) -> CoordinationResult {
        let started_at = current_timestamp();
        let started = Instant::now();

        if self.cancellation.is_cancelled() {
            warn!("Request refused: coordinator is shut down");
            let mut result = CoordinationResult::failure(text, "coordinator is shut down");
            result.metadata.started_at = started_at;
            result.metadata.completed_at = current_timestamp();
            return result;
        }

        let _active = ActiveRound::enter(&self.active_rounds);
        info!(
            round_budget_ms = self.config.round_budget.as_millis() as u64,
            "Starting coordination round"
        );

        let state = Mutex::new(RoundState::default());
        let round =
            AssertUnwindSafe(self.run_round(text, context.as_ref(), &state, progress)).catch_unwind();

        let end = tokio::select! {
            outcome = timeout(self.config.round_budget, round) => match outcome {
                Ok(Ok(())) => RoundEnd::Completed,
                Ok(Err(payload)) => RoundEnd::Panicked(panic_message(payload)),
                Err(_) => RoundEnd::TimedOut,
            },
            _ = self.cancellation.cancelled() => RoundEnd::Cancelled,
        };

        let state = state.into_inner().unwrap_or_else(PoisonError::into_inner);
        let result = self.assemble(text, state, end, started_at, started);

        info!(
            decision = %result.decision,
            confidence = result.confidence,
            duration_ms = result.metadata.duration_ms,
            timed_out = result.metadata.timed_out,
            "Coordination round finished"
        );
        self.learning.record(LearningFeedback::from(&result));
        result
    }

    async fn run_round(
        &self,
        text: &str,
        context: Option<&RequestContext>,
        state: &Mutex<RoundState>,
        progress: &dyn CoordinationProgress,
    ) {
        // Phase 1
        let report = run_phase(
            CoordinationPhase::Intent,
            state,
            progress,
            self.intent_phase(text, context, state),
        )
        .await;
        if report.is_abort() {
            lock(state).abort = report.detail;
            return;
        }
        let Some(intent) = report.value else {
            return;
        };

        // Phase 2
        let plan = run_phase(
            CoordinationPhase::Planning,
            state,
            progress,
            self.planning_phase(&intent, context, state),
        )
        .await
        .value;

        // Phase 3
        let consultation = run_phase(
            CoordinationPhase::Consultation,
            state,
            progress,
            self.consultation_phase(text, &intent, plan.as_ref(), state, progress),
        )
        .await
        .value;

        // Phase 4
        let aggregation = self.aggregation_phase(text, &intent, plan.as_ref(), consultation.as_ref());
        let Some(breakdown) = record_phase(CoordinationPhase::Aggregation, state, progress, aggregation).value
        else {
            return;
        };
        lock(state).breakdown = Some(breakdown.clone());

        // Phase 5
        let report = self.decision_phase(&intent, &breakdown);
        let Some(decision) = record_phase(CoordinationPhase::Decision, state, progress, report).value
        else {
            return;
        };
        lock(state).decision = Some(decision);
        progress.on_decision(decision, breakdown.total);

        // Phase 6
        if decision.is_approved() {
            let report = self.execution_phase(plan.as_ref(), consultation.as_ref());
            let execution =
                record_phase(CoordinationPhase::ExecutionPlanning, state, progress, report).value;
            lock(state).execution_plan = execution;
        }
    }

    /// Convert the round state into the public result
    fn assemble(
        &self,
        request: &str,
        state: RoundState,
        end: RoundEnd,
        started_at: u64,
        started: Instant,
    ) -> CoordinationResult {
        let RoundState {
            intent,
            plan,
            consultation,
            breakdown,
            decision,
            execution_plan,
            timings,
            participants,
            abort,
        } = state;

        let metadata = RoundMetadata {
            started_at,
            completed_at: current_timestamp(),
            duration_ms: started.elapsed().as_millis() as u64,
            phases: timings,
            participating_brains: participants.into_iter().collect(),
            timed_out: matches!(end, RoundEnd::TimedOut),
        };

        let interruption = match &end {
            RoundEnd::Completed => None,
            RoundEnd::TimedOut => Some(format!(
                "round budget exceeded after {}ms",
                self.config.round_budget.as_millis()
            )),
            RoundEnd::Cancelled => Some("round cancelled by shutdown".to_string()),
            RoundEnd::Panicked(message) => {
                warn!("Coordination round panicked: {}", message);
                let mut result = CoordinationResult::failure(
                    request,
                    format!("coordination failed unexpectedly: {}", message),
                );
                result.intent = intent;
                result.metadata = metadata;
                return result;
            }
        };

        let breakdown = breakdown.or_else(|| {
            intent
                .as_ref()
                .map(|i| self.breakdown_for(i, plan.as_ref(), consultation.as_ref()))
        });
        let confidence = breakdown.as_ref().map(|b| b.total).unwrap_or(0.0);

        // A decision made before an interruption stands
        let decision = match (&abort, decision) {
            (Some(_), _) => Decision::Rejected,
            (None, Some(decision)) => decision,
            (None, None) if intent.is_some() => Decision::RequiresReview,
            (None, None) => Decision::Rejected,
        };

        let mut risk = RiskAssessment::new(
            intent
                .as_ref()
                .map(|i| i.risk_level)
                .unwrap_or(RiskLevel::High),
        );
        if let Some(reason) = &abort {
            risk.add_factor(reason);
        }
        if let Some(intent) = &intent
            && intent.risk_level != RiskLevel::Low
        {
            risk.add_factor(&format!("request assessed as {} risk", intent.risk_level));
        }
        if intent.is_some() && abort.is_none() && plan.is_none() {
            risk.add_factor("no technical plan was produced");
        }
        if let Some(consultation) = &consultation {
            for failed in &consultation.failed_domains {
                risk.add_factor(&format!("no {} recommendation: {}", failed.domain, failed.reason));
            }
            for conflict in &consultation.resolved.conflicts {
                risk.add_factor(&conflict.description);
            }
            if let Some(reason) = &consultation.fallback_reason {
                risk.add_factor(&format!("consultation fell back: {}", reason));
            }
            for mitigation in &consultation.resolved.risk_mitigations {
                risk.add_mitigation(mitigation);
            }
        }
        if let Some(interruption) = &interruption {
            risk.add_factor(interruption);
        }

        CoordinationResult {
            request: request.to_string(),
            recommended_actions: recommended_actions(consultation.as_ref(), plan.as_ref()),
            execution_plan: if interruption.is_none() && decision.is_approved() {
                execution_plan
            } else {
                None
            },
            error: abort.or(interruption),
            intent,
            technical_plan: plan,
            consultation,
            breakdown: breakdown.unwrap_or_default(),
            decision,
            confidence,
            risk,
            metadata,
        }
    }
}

/// Time a phase future and report it
async fn run_phase<T>(
    phase: CoordinationPhase,
    state: &Mutex<RoundState>,
    progress: &dyn CoordinationProgress,
    future: impl Future<Output = PhaseReport<T>>,
) -> PhaseReport<T> {
    progress.on_phase_start(phase);
    let started = Instant::now();
    let report = future.await;
    finish_phase(phase, state, progress, &report, started);
    report
}

/// Report a synchronous phase
fn record_phase<T>(
    phase: CoordinationPhase,
    state: &Mutex<RoundState>,
    progress: &dyn CoordinationProgress,
    report: PhaseReport<T>,
) -> PhaseReport<T> {
    progress.on_phase_start(phase);
    finish_phase(phase, state, progress, &report, Instant::now());
    report
}

fn finish_phase<T>(
    phase: CoordinationPhase,
    state: &Mutex<RoundState>,
    progress: &dyn CoordinationProgress,
    report: &PhaseReport<T>,
    started: Instant,
) {
    let duration_ms = started.elapsed().as_millis() as u64;
    match &report.detail {
        Some(detail) => info!(
            phase = %phase,
            outcome = report.outcome.as_str(),
            duration_ms,
            "Phase {} finished: {}",
            phase.number(),
            detail
        ),
        None => info!(
            phase = %phase,
            outcome = report.outcome.as_str(),
            duration_ms,
            "Phase {} finished",
            phase.number()
        ),
    }

    lock(state).timings.push(PhaseTiming {
        phase,
        outcome: report.outcome,
        duration_ms,
        detail: report.detail.clone(),
    });
    progress.on_phase_complete(phase, report.outcome);
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::brain::BrainError;
    use crate::use_cases::test_support::{
        ScriptedExpert, ScriptedIntent, ScriptedPlanner, call_log, register_expert,
        register_intent, register_planner,
    };
    use std::time::Duration;
    use synapse_domain::{ConsultationPattern, ExpertDomain::*, PhaseOutcome, PlanStep};

    fn analysis(confidence: f64, risk: RiskLevel, requirements: &[&str]) -> IntentAnalysis {
        IntentAnalysis::new(confidence, risk)
            .with_requirements(requirements.iter().map(|r| r.to_string()).collect())
    }

    fn plan(confidence: f64) -> TechnicalPlan {
        TechnicalPlan::new(
            confidence,
            vec![
                PlanStep::new("Provision KMS key", 20),
                PlanStep::new("Enable encryption on the backup bucket", 40),
            ],
        )
        .with_resources(vec!["kms".into()])
    }

    struct RecordingSink {
        records: Mutex<Vec<LearningFeedback>>,
    }

    impl LearningSink for RecordingSink {
        fn record(&self, feedback: LearningFeedback) {
            self.records.lock().unwrap().push(feedback);
        }
    }

    /// Intent + planner + Security and Storage experts at `domain_confidence`
    async fn setup(
        intent: IntentAnalysis,
        plan_result: Result<TechnicalPlan, BrainError>,
        domain_confidence: f64,
    ) -> (Arc<BrainRegistry>, Arc<ScriptedPlanner>, crate::use_cases::test_support::CallLog) {
        let registry = Arc::new(BrainRegistry::new());
        let log = call_log();
        register_intent(&registry, Arc::new(ScriptedIntent::new(Ok(intent)))).await;
        let planner = Arc::new(ScriptedPlanner::new(plan_result));
        register_planner(&registry, Arc::clone(&planner)).await;
        register_expert(
            &registry,
            ScriptedExpert::new(Security, domain_confidence, "Use envelope encryption.", &log)
                .with_steps(&["Create a KMS key", "Encrypt backups with the key"]),
        )
        .await;
        register_expert(
            &registry,
            ScriptedExpert::new(Storage, domain_confidence, "Keep backups versioned.", &log)
                .with_steps(&["Enable bucket versioning"]),
        )
        .await;
        (registry, planner, log)
    }

    const ENCRYPT_BACKUPS: &[&str] = &["Encrypt the database backups"];

    #[tokio::test]
    async fn test_low_intent_rejects_without_downstream_calls() {
        let (registry, planner, log) = setup(
            analysis(0.1, RiskLevel::Low, ENCRYPT_BACKUPS),
            Ok(plan(0.9)),
            0.9,
        )
        .await;
        let coordinator = Coordinator::new(registry);

        let result = coordinator.submit("encrypt backups", None).await;

        assert_eq!(result.decision, Decision::Rejected);
        assert!(result.error.as_deref().unwrap().contains("below the minimum"));
        assert_eq!(planner.calls.load(Ordering::SeqCst), 0);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(result.metadata.phases.len(), 1);
        assert_eq!(result.metadata.phases[0].outcome, PhaseOutcome::Abort);
        assert!(result.execution_plan.is_none());
    }

    #[tokio::test]
    async fn test_missing_intent_brain_rejects() {
        let coordinator = Coordinator::new(Arc::new(BrainRegistry::new()));
        let result = coordinator.submit("anything", None).await;

        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.risk.level, RiskLevel::High);
        assert!(result.error.unwrap().contains("no active intent brain"));
    }

    #[tokio::test]
    async fn test_failing_intent_rejects() {
        let registry = Arc::new(BrainRegistry::new());
        register_intent(
            &registry,
            Arc::new(ScriptedIntent::new(Err(BrainError::Failed("model offline".into())))),
        )
        .await;
        let result = Coordinator::new(registry).submit("deploy", None).await;

        assert_eq!(result.decision, Decision::Rejected);
        assert!(result.error.unwrap().contains("model offline"));
    }

    #[tokio::test]
    async fn test_approval_boundary_is_inclusive() {
        let (registry, _, _) = setup(
            analysis(0.75, RiskLevel::Medium, ENCRYPT_BACKUPS),
            Ok(plan(0.75)),
            0.75,
        )
        .await;
        let result = Coordinator::new(registry)
            .submit("Encrypt the database backups", None)
            .await;

        assert!((result.confidence - 0.75).abs() < 1e-12);
        assert_eq!(result.decision, Decision::Approved);
        assert_eq!(result.metadata.phases.len(), 6);

        let execution = result.execution_plan.unwrap();
        assert_eq!(execution.steps[0].description, "Provision KMS key");
        assert!(execution.resources.contains(&"kms".to_string()));
        assert!(!result.recommended_actions.is_empty());
    }

    #[tokio::test]
    async fn test_just_below_approval_requires_review() {
        let (registry, _, _) = setup(
            analysis(0.7, RiskLevel::Medium, ENCRYPT_BACKUPS),
            Ok(plan(0.75)),
            0.75,
        )
        .await;
        let result = Coordinator::new(registry)
            .submit("Encrypt the database backups", None)
            .await;

        assert!((result.confidence - 0.73).abs() < 1e-9);
        assert_eq!(result.decision, Decision::RequiresReview);
        assert!(result.execution_plan.is_none());
        assert_eq!(result.metadata.phases.len(), 5);
    }

    #[tokio::test]
    async fn test_high_risk_mid_confidence_escalates() {
        let registry = Arc::new(BrainRegistry::new());
        let log = call_log();
        register_intent(
            &registry,
            Arc::new(ScriptedIntent::new(Ok(analysis(
                0.6,
                RiskLevel::High,
                &["Encrypt customer data"],
            )))),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Security, 0.6, "Use KMS.", &log)).await;

        let result = Coordinator::new(registry).submit("encrypt data", None).await;

        assert!((result.confidence - 0.42).abs() < 1e-9);
        assert_eq!(result.decision, Decision::Escalated);
        assert_eq!(result.risk.level, RiskLevel::High);
        assert!(
            result
                .risk
                .factors
                .contains(&"no technical plan was produced".to_string())
        );
    }

    #[tokio::test]
    async fn test_planner_failure_is_partial() {
        let (registry, planner, log) = setup(
            analysis(0.9, RiskLevel::Low, ENCRYPT_BACKUPS),
            Err(BrainError::Timeout("slow".into())),
            0.9,
        )
        .await;
        let result = Coordinator::new(registry)
            .submit("Encrypt the database backups", None)
            .await;

        assert_eq!(planner.calls.load(Ordering::SeqCst), 1);
        assert!(result.technical_plan.is_none());
        let planning = &result.metadata.phases[1];
        assert_eq!(planning.phase, CoordinationPhase::Planning);
        assert_eq!(planning.outcome, PhaseOutcome::Partial);
        // Consultation still ran
        assert_eq!(log.lock().unwrap().len(), 2);
        assert!(result.consultation.is_some());
    }

    #[tokio::test]
    async fn test_low_confidence_intent_skips_consultation() {
        let (registry, planner, log) = setup(
            analysis(0.45, RiskLevel::Low, ENCRYPT_BACKUPS),
            Ok(plan(0.5)),
            0.9,
        )
        .await;
        let result = Coordinator::new(registry).submit("backups", None).await;

        assert_eq!(planner.calls.load(Ordering::SeqCst), 1);
        assert!(log.lock().unwrap().is_empty());
        assert!(result.consultation.is_none());
        assert!(result.error.is_none());
        // 0.4 * 0.45 + 0.3 * 0.5
        assert!((result.confidence - 0.33).abs() < 1e-9);
        assert_eq!(result.decision, Decision::Rejected);
    }

    #[tokio::test]
    async fn test_pattern_override() {
        let (registry, _, _) = setup(
            analysis(0.9, RiskLevel::Low, ENCRYPT_BACKUPS),
            Ok(plan(0.9)),
            0.9,
        )
        .await;
        let coordinator = Coordinator::new(registry).with_config(
            CoordinatorConfig::default().with_pattern_override(Some(ConsultationPattern::Sequential)),
        );
        let result = coordinator.submit("Encrypt backups", None).await;

        assert_eq!(
            result.consultation.unwrap().pattern,
            ConsultationPattern::Sequential
        );
    }

    #[tokio::test]
    async fn test_round_budget_keeps_completed_state() {
        let registry = Arc::new(BrainRegistry::new());
        register_intent(
            &registry,
            Arc::new(ScriptedIntent::new(Ok(analysis(0.9, RiskLevel::Low, ENCRYPT_BACKUPS)))),
        )
        .await;
        register_planner(
            &registry,
            Arc::new(ScriptedPlanner::new(Ok(plan(0.9))).with_delay(Duration::from_secs(5))),
        )
        .await;

        let coordinator = Coordinator::new(registry)
            .with_config(CoordinatorConfig::default().with_round_budget(Duration::from_millis(150)));
        let started = std::time::Instant::now();
        let result = coordinator.submit("Encrypt backups", None).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(result.metadata.timed_out);
        assert!(result.intent.is_some());
        assert_eq!(result.decision, Decision::RequiresReview);
        assert!(result.execution_plan.is_none());
        assert!(result.risk.factors.iter().any(|f| f.contains("budget exceeded")));
        assert_eq!(coordinator.status().active_rounds, 0);
    }

    #[tokio::test]
    async fn test_intent_timeout_before_budget_rejects() {
        let registry = Arc::new(BrainRegistry::new());
        register_intent(
            &registry,
            Arc::new(
                ScriptedIntent::new(Ok(analysis(0.9, RiskLevel::Low, &[])))
                    .with_delay(Duration::from_secs(5)),
            ),
        )
        .await;
        let coordinator = Coordinator::new(registry)
            .with_config(CoordinatorConfig::default().with_intent_timeout(Duration::from_millis(50)));

        let result = coordinator.submit("deploy", None).await;
        assert_eq!(result.decision, Decision::Rejected);
        assert!(!result.metadata.timed_out);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_panicking_brain_is_rejected_with_high_risk() {
        let registry = Arc::new(BrainRegistry::new());
        register_intent(
            &registry,
            Arc::new(ScriptedIntent::new(Ok(analysis(0.9, RiskLevel::Low, &[]))).panicking()),
        )
        .await;
        let coordinator = Coordinator::new(registry);

        let result = coordinator.submit("deploy", None).await;
        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.risk.level, RiskLevel::High);
        assert!(result.error.unwrap().contains("scripted intent panic"));
        assert_eq!(coordinator.status().active_rounds, 0);
    }

    #[tokio::test]
    async fn test_resubmission_has_same_outcome() {
        let (registry, _, _) = setup(
            analysis(0.8, RiskLevel::Medium, ENCRYPT_BACKUPS),
            Ok(plan(0.8)),
            0.85,
        )
        .await;
        let coordinator = Coordinator::new(registry);

        let first = coordinator.submit("Encrypt the database backups", None).await;
        let second = coordinator.submit("Encrypt the database backups", None).await;
        assert!(first.same_outcome(&second));
    }

    #[tokio::test]
    async fn test_learning_sink_receives_feedback() {
        let (registry, _, _) = setup(
            analysis(0.9, RiskLevel::Low, ENCRYPT_BACKUPS),
            Ok(plan(0.9)),
            0.9,
        )
        .await;
        let sink = Arc::new(RecordingSink {
            records: Mutex::new(Vec::new()),
        });
        let coordinator = Coordinator::new(registry).with_learning(sink.clone());

        let result = coordinator.submit("Encrypt backups", None).await;

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decision, result.decision);
        assert_eq!(
            records[0].participating_brains,
            vec!["intent", "planner", "security-expert", "storage-expert"]
        );
    }

    #[tokio::test]
    async fn test_shutdown_refuses_new_rounds() {
        let (registry, _, log) = setup(
            analysis(0.9, RiskLevel::Low, ENCRYPT_BACKUPS),
            Ok(plan(0.9)),
            0.9,
        )
        .await;
        let coordinator = Coordinator::new(registry);
        coordinator.shutdown();

        let result = coordinator.submit("Encrypt backups", None).await;
        assert_eq!(result.decision, Decision::Rejected);
        assert!(log.lock().unwrap().is_empty());

        let status = coordinator.status();
        assert!(status.shut_down);
        assert_eq!(status.active_rounds, 0);
        assert_eq!(status.registered_brain_ids.len(), 4);
    }
}
