//! Orchestrate use case
//!
//! Runs one consultation round with one of five patterns and hands the
//! gathered recommendations to the [`ConflictResolver`].
//!
//! | Pattern | Scheduling |
//! |---------|------------|
//! | parallel | every target at once under one deadline |
//! | sequential | influence order, one at a time, each with budget / count |
//! | hierarchical | priority tiers, each tier in parallel with remaining / tiers left |
//! | conditional | urgent targets on half the budget, then triggered domains on a quarter each |
//! | collaborative | one parallel round plus N rounds sharing insights between related domains |
//!
//! A failed, timed-out or missing expert never aborts the round; the domain
//! is recorded in `failed_domains` and omitted. Targets a pattern decides not
//! to consult are listed in `skipped_domains`.

mod collaborative;
mod conditional;
mod hierarchical;
mod parallel;
mod sequential;

use crate::config::OrchestratorConfig;
use crate::ports::brain::{BrainError, DomainExpert};
use crate::ports::progress::{CoordinationProgress, NoProgress};
use crate::registry::BrainRegistry;
use futures::FutureExt;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use synapse_domain::core::confidence::has_consensus;
use synapse_domain::{
    ConflictResolver, ConsultationPattern, ConsultationRequest, ConsultationResult,
    DomainError, DomainPriority, DomainQuery, DomainRecommendation, ExpertDomain,
    FailedConsultation, ResolutionError, ResolvedRecommendation, clamp_confidence,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

/// Errors that end a consultation round
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("Conflict resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Result of one expert call
#[derive(Debug)]
pub(crate) struct DomainCall {
    pub domain: ExpertDomain,
    pub brain_id: Option<String>,
    pub outcome: Result<DomainRecommendation, FailedConsultation>,
}

/// Everything gathered during one round
#[derive(Debug, Default)]
pub(crate) struct Gathered {
    pub recommendations: BTreeMap<ExpertDomain, DomainRecommendation>,
    pub failed: BTreeMap<ExpertDomain, FailedConsultation>,
    /// Targets deliberately left out
    pub skipped: BTreeSet<ExpertDomain>,
    pub participants: BTreeSet<String>,
}

impl Gathered {
    /// Later answers overwrite earlier ones; a failure never replaces an
    /// answer already gathered.
    pub fn record(&mut self, call: DomainCall) {
        if let Some(id) = call.brain_id {
            self.participants.insert(id);
        }
        match call.outcome {
            Ok(rec) => {
                self.failed.remove(&call.domain);
                self.recommendations.insert(call.domain, rec);
            }
            Err(failure) => {
                if !self.recommendations.contains_key(&call.domain) {
                    self.failed.insert(call.domain, failure);
                }
            }
        }
    }

    pub fn record_all(&mut self, calls: Vec<DomainCall>) {
        for call in calls {
            self.record(call);
        }
    }

    pub fn attempted(&self, domain: ExpertDomain) -> bool {
        self.recommendations.contains_key(&domain) || self.failed.contains_key(&domain)
    }
}

/// Runs consultation rounds against the experts in a [`BrainRegistry`]
pub struct Orchestrator {
    registry: Arc<BrainRegistry>,
    resolver: ConflictResolver,
    config: OrchestratorConfig,
    /// Summaries of earlier rounds, oldest first
    history: Mutex<Vec<String>>,
}

impl Orchestrator {
    pub fn new(registry: Arc<BrainRegistry>) -> Self {
        Self {
            registry,
            resolver: ConflictResolver::new(),
            config: OrchestratorConfig::default(),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Build and run a request in one step.
    ///
    /// `budget` defaults to the configured budget. Validation errors are
    /// returned before any expert is called.
    pub async fn consult(
        &self,
        query: &str,
        pattern: ConsultationPattern,
        targets: BTreeMap<ExpertDomain, DomainPriority>,
        budget: Option<Duration>,
    ) -> Result<ConsultationResult, OrchestrationError> {
        let request = ConsultationRequest::new(
            query,
            pattern,
            targets,
            budget.unwrap_or(self.config.default_budget),
        )?;
        self.orchestrate(&request).await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn orchestrate(
        &self,
        request: &ConsultationRequest,
    ) -> Result<ConsultationResult, OrchestrationError> {
        self.orchestrate_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn orchestrate_with_progress(
        &self,
        request: &ConsultationRequest,
        progress: &dyn CoordinationProgress,
    ) -> Result<ConsultationResult, OrchestrationError> {
        let started = Instant::now();
        let deadline = started + request.budget();

        info!(
            pattern = %request.pattern(),
            targets = request.targets().len(),
            budget_ms = request.budget().as_millis() as u64,
            "Starting consultation"
        );

        let gathered = match request.pattern() {
            ConsultationPattern::Parallel => self.run_parallel(request, deadline, progress).await,
            ConsultationPattern::Sequential => {
                self.run_sequential(request, deadline, progress).await
            }
            ConsultationPattern::Hierarchical => {
                self.run_hierarchical(request, deadline, progress).await
            }
            ConsultationPattern::Conditional => {
                self.run_conditional(request, deadline, progress).await
            }
            ConsultationPattern::Collaborative => {
                self.run_collaborative(request, deadline, progress).await
            }
        };

        self.finish(request, gathered, started)
    }

    fn finish(
        &self,
        request: &ConsultationRequest,
        gathered: Gathered,
        started: Instant,
    ) -> Result<ConsultationResult, OrchestrationError> {
        let Gathered {
            recommendations,
            failed,
            skipped,
            participants,
        } = gathered;

        let mut fallback_reason = None;
        let mut resolved = if recommendations.is_empty() {
            let reason = "no expert recommendation was gathered";
            warn!(failed = failed.len(), "Consultation gathered nothing, using fallback");
            fallback_reason = Some(reason);
            let lead = request
                .targets()
                .keys()
                .next()
                .copied()
                .unwrap_or(ExpertDomain::ALL[0]);
            ResolvedRecommendation::fallback(lead, reason, Vec::new())
        } else {
            self.resolver.resolve(&recommendations)?
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        self.remember(&resolved);

        let confidences: Vec<f64> = recommendations.values().map(|r| r.confidence).collect();
        if request.consensus_required() && !has_consensus(&confidences) {
            warn!("Consensus was required but not reached");
            resolved
                .risk_mitigations
                .push("Consensus was required but not reached; review before acting".into());
        }

        info!(
            strategy = %resolved.strategy,
            consulted = recommendations.len(),
            failed = failed.len(),
            skipped = skipped.len(),
            duration_ms,
            "Consultation finished"
        );

        let mut result = ConsultationResult::new(
            request.pattern(),
            recommendations,
            failed.into_values().collect(),
            resolved,
            duration_ms,
        )
        .with_participants(participants.into_iter().collect())
        .with_skipped_domains(skipped.into_iter().collect());
        if let Some(reason) = fallback_reason {
            result = result.with_fallback_reason(reason);
        }
        Ok(result)
    }

    fn remember(&self, resolved: &ResolvedRecommendation) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push(resolved.primary.summary());
        let excess = history.len().saturating_sub(self.config.history_limit);
        history.drain(..excess);
    }

    pub(crate) fn history_snapshot(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Query a batch of domains concurrently under one deadline.
    ///
    /// Domains without an active expert fail immediately. Calls still
    /// running at the deadline are aborted and recorded as timed out.
    pub(crate) async fn consult_batch(
        &self,
        queries: Vec<DomainQuery>,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Vec<DomainCall> {
        let mut calls = Vec::with_capacity(queries.len());
        let mut pending: BTreeMap<ExpertDomain, String> = BTreeMap::new();
        let mut join_set = JoinSet::new();

        for query in queries {
            let domain = query.domain;
            let Some((brain_id, expert)) = self.registry.expert_for(domain) else {
                let error = BrainError::Unavailable(format!("no active expert for {}", domain));
                debug!(%domain, "{}", error);
                progress.on_domain_complete(domain, false);
                calls.push(DomainCall {
                    domain,
                    brain_id: None,
                    outcome: Err(FailedConsultation::new(domain, error.to_string())),
                });
                continue;
            };

            debug!(%domain, brain = %brain_id, round = query.context.round, "Consulting expert");
            progress.on_domain_start(domain);
            pending.insert(domain, brain_id);
            join_set.spawn(async move { (domain, call_expert(expert, query).await) });
        }

        while !join_set.is_empty() {
            match timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((domain, result)))) => {
                    let brain_id = pending.remove(&domain);
                    progress.on_domain_complete(domain, result.is_ok());
                    let outcome = result.map_err(|e| {
                        warn!(%domain, "Expert call failed: {}", e);
                        if e.is_timeout() {
                            FailedConsultation::timeout(domain)
                        } else {
                            FailedConsultation::new(domain, e.to_string())
                        }
                    });
                    calls.push(DomainCall {
                        domain,
                        brain_id,
                        outcome,
                    });
                }
                Ok(Some(Err(e))) => {
                    warn!("Expert task join error: {}", e);
                }
                Ok(None) => break,
                Err(_) => {
                    join_set.abort_all();
                    break;
                }
            }
        }

        for (domain, brain_id) in pending {
            warn!(%domain, brain = %brain_id, "Expert missed the deadline");
            progress.on_domain_complete(domain, false);
            calls.push(DomainCall {
                domain,
                brain_id: Some(brain_id),
                outcome: Err(FailedConsultation::timeout(domain)),
            });
        }

        calls
    }
}

/// Call one expert, normalizing its answer to the queried domain.
async fn call_expert(
    expert: Arc<dyn DomainExpert>,
    query: DomainQuery,
) -> Result<DomainRecommendation, BrainError> {
    let domain = query.domain;
    let mut rec = AssertUnwindSafe(expert.provide(&query))
        .catch_unwind()
        .await
        .map_err(|_| BrainError::Failed(format!("{} expert panicked", domain)))??;

    if !rec.confidence.is_finite() {
        return Err(BrainError::Failed(format!(
            "{} expert returned a non-finite confidence",
            domain
        )));
    }
    rec.domain = domain;
    rec.confidence = clamp_confidence(rec.confidence);
    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        ScriptedExpert, call_log, logged_domains, register_expert,
    };
    use synapse_domain::{ExpertDomain::*, ResolutionStrategy};

    fn targets(entries: &[(ExpertDomain, DomainPriority)]) -> BTreeMap<ExpertDomain, DomainPriority> {
        entries.iter().copied().collect()
    }

    fn request(
        pattern: ConsultationPattern,
        entries: &[(ExpertDomain, DomainPriority)],
        budget: Duration,
    ) -> ConsultationRequest {
        ConsultationRequest::new("Expose the billing API", pattern, targets(entries), budget)
            .unwrap()
    }

    #[tokio::test]
    async fn test_parallel_deadline_drops_slow_expert() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.8, "Use mTLS.", &log)).await;
        register_expert(&registry, ScriptedExpert::new(Network, 0.75, "Add a gateway.", &log))
            .await;
        register_expert(
            &registry,
            ScriptedExpert::new(Storage, 0.9, "Encrypt volumes.", &log)
                .with_delay(Duration::from_secs(5)),
        )
        .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Parallel,
            &[
                (Security, DomainPriority::High),
                (Network, DomainPriority::Medium),
                (Storage, DomainPriority::Medium),
            ],
            Duration::from_millis(200),
        );

        let started = std::time::Instant::now();
        let result = orchestrator.orchestrate(&req).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));

        assert_eq!(result.consulted_domains, vec![Security, Network]);
        assert_eq!(result.failed_domains.len(), 1);
        assert_eq!(result.failed_domains[0].domain, Storage);
        assert!(result.failed_domains[0].timed_out);
        assert_eq!(result.timed_out_count(), 1);
    }

    #[tokio::test]
    async fn test_sequential_follows_influence_order() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        for (domain, text) in [
            (Monitoring, "Alert on error rates."),
            (Orchestration, "Run two replicas."),
            (Network, "Terminate TLS at the edge."),
            (Security, "Require OAuth scopes."),
        ] {
            register_expert(&registry, ScriptedExpert::new(domain, 0.8, text, &log)).await;
        }

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Sequential,
            &[
                (Monitoring, DomainPriority::Low),
                (Orchestration, DomainPriority::Medium),
                (Network, DomainPriority::High),
                (Security, DomainPriority::Critical),
            ],
            Duration::from_secs(5),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();
        assert_eq!(result.consulted_domains.len(), 4);

        assert_eq!(
            logged_domains(&log),
            vec![Security, Network, Orchestration, Monitoring]
        );
        let highlight_counts: Vec<usize> = log
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.context.highlights.len())
            .collect();
        assert_eq!(highlight_counts, vec![0, 1, 2, 3]);

        let last = log.lock().unwrap()[3].clone();
        assert_eq!(last.context.highlights[0], "[security] Require OAuth scopes");
    }

    #[tokio::test]
    async fn test_history_carries_into_next_round() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.8, "Rotate keys.", &log)).await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Sequential,
            &[(Security, DomainPriority::High)],
            Duration::from_secs(2),
        );
        orchestrator.orchestrate(&req).await.unwrap();
        orchestrator.orchestrate(&req).await.unwrap();

        let queries = log.lock().unwrap().clone();
        assert!(queries[0].context.history.is_empty());
        assert_eq!(queries[1].context.history.len(), 1);
        assert!(queries[1].context.history[0].contains("Rotate keys"));
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Network, 0.8, "Open port 443.", &log)).await;

        let orchestrator = Orchestrator::new(registry)
            .with_config(OrchestratorConfig::default().with_history_limit(2));
        let req = request(
            ConsultationPattern::Parallel,
            &[(Network, DomainPriority::High)],
            Duration::from_secs(2),
        );
        for _ in 0..4 {
            orchestrator.orchestrate(&req).await.unwrap();
        }
        assert_eq!(orchestrator.history_snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_hierarchical_shares_earlier_tiers() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.85, "Sign requests.", &log))
            .await;
        register_expert(&registry, ScriptedExpert::new(Network, 0.8, "Use a private link.", &log))
            .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Hierarchical,
            &[
                (Network, DomainPriority::Medium),
                (Security, DomainPriority::Critical),
            ],
            Duration::from_secs(4),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();
        assert_eq!(result.consulted_domains, vec![Security, Network]);

        let queries = log.lock().unwrap().clone();
        assert_eq!(queries[0].domain, Security);
        assert!(queries[0].context.shared_insights.is_empty());
        assert_eq!(queries[1].domain, Network);
        assert_eq!(
            queries[1].context.shared_insights.get(&Security).map(String::as_str),
            Some("[security] Sign requests")
        );
    }

    #[tokio::test]
    async fn test_conditional_pulls_in_triggered_domains() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(
                Network,
                0.8,
                "Restrict ingress. Review security groups and alert on drops.",
                &log,
            ),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Storage, 0.7, "Add a volume.", &log)).await;
        register_expert(&registry, ScriptedExpert::new(Security, 0.85, "Audit rules.", &log))
            .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Conditional,
            &[(Network, DomainPriority::High), (Storage, DomainPriority::Low)],
            Duration::from_secs(4),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();

        // Monitoring is triggered too but has no expert; Storage is not urgent
        assert_eq!(logged_domains(&log), vec![Network, Security]);
        assert_eq!(result.consulted_domains, vec![Security, Network]);
        assert!(result.failed_domains.is_empty());
        assert_eq!(result.skipped_domains, vec![Storage]);
    }

    #[tokio::test]
    async fn test_sequential_slow_expert_does_not_starve_later_ones() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.9, "Require OAuth scopes.", &log)
                .with_delay(Duration::from_secs(5)),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Network, 0.8, "Terminate TLS.", &log))
            .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Sequential,
            &[(Security, DomainPriority::High), (Network, DomainPriority::High)],
            Duration::from_millis(600),
        );

        let started = std::time::Instant::now();
        let result = orchestrator.orchestrate(&req).await.unwrap();
        let elapsed = started.elapsed();

        // Security gets 300ms of the 600ms budget, then Network runs
        assert_eq!(logged_domains(&log), vec![Security, Network]);
        assert!(elapsed >= Duration::from_millis(250), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(550), "{:?}", elapsed);
        assert_eq!(result.consulted_domains, vec![Network]);
        assert_eq!(result.failed_domains.len(), 1);
        assert_eq!(result.failed_domains[0].domain, Security);
        assert!(result.failed_domains[0].timed_out);
    }

    #[tokio::test]
    async fn test_hierarchical_tier_gets_share_of_remaining_budget() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.9, "Sign requests.", &log)
                .with_delay(Duration::from_secs(5)),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Monitoring, 0.8, "Track p99.", &log))
            .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Hierarchical,
            &[(Security, DomainPriority::Critical), (Monitoring, DomainPriority::Low)],
            Duration::from_millis(600),
        );

        let started = std::time::Instant::now();
        let result = orchestrator.orchestrate(&req).await.unwrap();
        let elapsed = started.elapsed();

        // two tiers: the critical tier is cut at half the budget
        assert!(elapsed >= Duration::from_millis(250), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(550), "{:?}", elapsed);
        assert_eq!(result.consulted_domains, vec![Monitoring]);
        assert!(result.is_failed(Security));
        assert_eq!(result.timed_out_count(), 1);
    }

    #[tokio::test]
    async fn test_conditional_triggered_domain_gets_quarter_budget() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Network, 0.8, "Review security groups and alert on drops.", &log),
        )
        .await;
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.85, "Audit rules.", &log)
                .with_delay(Duration::from_secs(5)),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Monitoring, 0.7, "Page on drops.", &log))
            .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Conditional,
            &[(Network, DomainPriority::High)],
            Duration::from_millis(800),
        );

        let started = std::time::Instant::now();
        let result = orchestrator.orchestrate(&req).await.unwrap();
        let elapsed = started.elapsed();

        // Security is cut after 200ms, leaving time for Monitoring
        assert_eq!(logged_domains(&log), vec![Network, Security, Monitoring]);
        assert!(elapsed >= Duration::from_millis(150), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(600), "{:?}", elapsed);
        assert_eq!(result.consulted_domains, vec![Network, Monitoring]);
        assert!(result.is_failed(Security));
        assert!(result.failed_domains[0].timed_out);
    }

    #[tokio::test]
    async fn test_collaborative_rounds_share_insights() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.7, "Pin certificates.", &log).with_round_bonus(0.05),
        )
        .await;
        register_expert(
            &registry,
            ScriptedExpert::new(Network, 0.7, "Segment the VPC.", &log).with_round_bonus(0.05),
        )
        .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Collaborative,
            &[(Security, DomainPriority::High), (Network, DomainPriority::High)],
            Duration::from_secs(6),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();

        let queries = log.lock().unwrap().clone();
        assert_eq!(queries.len(), 6);
        let last_round: Vec<_> = queries.iter().filter(|q| q.context.round == 2).collect();
        assert_eq!(last_round.len(), 2);
        for query in last_round {
            let other = if query.domain == Security { Network } else { Security };
            assert!(query.context.shared_insights.contains_key(&other));
        }

        let security = result.domain_confidences[&Security];
        assert!((security - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_expert_is_failed_domain() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.8, "Use SSO.", &log)).await;

        let orchestrator = Orchestrator::new(registry);
        let result = orchestrator
            .consult(
                "Add login",
                ConsultationPattern::Parallel,
                targets(&[(Security, DomainPriority::High), (Storage, DomainPriority::Low)]),
                Some(Duration::from_secs(2)),
            )
            .await
            .unwrap();

        assert_eq!(result.consulted_domains, vec![Security]);
        assert_eq!(result.failed_domains.len(), 1);
        assert_eq!(result.failed_domains[0].domain, Storage);
        assert!(!result.failed_domains[0].timed_out);
    }

    #[tokio::test]
    async fn test_all_failed_yields_fallback() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.8, "unused", &log)
                .failing(BrainError::Failed("model offline".into())),
        )
        .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Parallel,
            &[(Security, DomainPriority::High), (Network, DomainPriority::High)],
            Duration::from_secs(2),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();

        assert!(result.consulted_domains.is_empty());
        assert_eq!(result.failed_domains.len(), 2);
        assert_eq!(result.resolved.strategy, ResolutionStrategy::Fallback);
        assert!((result.resolved.confidence - 0.1).abs() < f64::EPSILON);
        assert!(result.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn test_misbehaving_experts_are_contained() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(
            &registry,
            ScriptedExpert::new(Security, 0.8, "x", &log).with_raw_confidence(f64::NAN),
        )
        .await;
        register_expert(&registry, ScriptedExpert::new(Network, 0.8, "x", &log).panicking()).await;
        register_expert(
            &registry,
            ScriptedExpert::new(Storage, 0.8, "Snapshot nightly.", &log).with_raw_confidence(1.7),
        )
        .await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Parallel,
            &[
                (Security, DomainPriority::High),
                (Network, DomainPriority::High),
                (Storage, DomainPriority::High),
            ],
            Duration::from_secs(2),
        );
        let result = orchestrator.orchestrate(&req).await.unwrap();

        assert_eq!(result.consulted_domains, vec![Storage]);
        assert_eq!(result.domain_confidences[&Storage], 1.0);
        let failed: Vec<ExpertDomain> = result.failed_domains.iter().map(|f| f.domain).collect();
        assert_eq!(failed, vec![Security, Network]);
    }

    #[tokio::test]
    async fn test_consensus_required_but_missing() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.9, "Use HSM.", &log)).await;
        register_expert(&registry, ScriptedExpert::new(Network, 0.3, "Use VPN.", &log)).await;
        register_expert(&registry, ScriptedExpert::new(Storage, 0.4, "Use disks.", &log)).await;

        let orchestrator = Orchestrator::new(registry);
        let req = request(
            ConsultationPattern::Parallel,
            &[
                (Security, DomainPriority::High),
                (Network, DomainPriority::High),
                (Storage, DomainPriority::High),
            ],
            Duration::from_secs(2),
        )
        .with_consensus_required(true);
        let result = orchestrator.orchestrate(&req).await.unwrap();

        assert!(!result.consensus);
        assert!(
            result
                .resolved
                .risk_mitigations
                .iter()
                .any(|m| m.contains("Consensus was required"))
        );
    }

    #[tokio::test]
    async fn test_consult_rejects_invalid_request() {
        let log = call_log();
        let registry = Arc::new(BrainRegistry::new());
        register_expert(&registry, ScriptedExpert::new(Security, 0.8, "x", &log)).await;
        let orchestrator = Orchestrator::new(registry);

        let err = orchestrator
            .consult(
                "   ",
                ConsultationPattern::Parallel,
                targets(&[(Security, DomainPriority::High)]),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Validation(_)));

        let err = orchestrator
            .consult(
                "Add login",
                ConsultationPattern::Parallel,
                BTreeMap::new(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Validation(_)));
        assert!(log.lock().unwrap().is_empty());
    }
}
