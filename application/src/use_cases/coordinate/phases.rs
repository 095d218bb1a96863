//! Phase implementations of a coordination round.
//!
//! Every phase returns a [`PhaseReport`]; only the intent phase can abort.
//! Completed work is written to the shared [`RoundState`] as soon as it
//! exists so that an expired round keeps it.

use super::{Coordinator, RoundState, lock};
use crate::ports::progress::CoordinationProgress;
use crate::use_cases::orchestrate::{Gathered, OrchestrationError};
use std::sync::Mutex;
use synapse_domain::rules::derive_targets;
use synapse_domain::{
    AggregationContext, ConfidenceBreakdown, ConfidenceScore, ConsultationPattern,
    ConsultationRequest, ConsultationResult, Decision, ExecutionPlan, ExpertDomain,
    IntentAnalysis, PhaseOutcome, PhaseReport, QueryContext, RequestContext,
    ResolvedRecommendation, TechnicalPlan, clamp_confidence,
};
use synapse_domain::coordination::{complexity_score, pattern_for_complexity};
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

impl Coordinator {
    /// Phase 1. Aborts on a missing, failing or unsure intent Brain.
    pub(super) async fn intent_phase(
        &self,
        text: &str,
        context: Option<&RequestContext>,
        state: &Mutex<RoundState>,
    ) -> PhaseReport<IntentAnalysis> {
        let Some((brain_id, analyzer)) = self.registry.intent_analyzer() else {
            return PhaseReport::abort("no active intent brain is registered");
        };
        lock(state).participants.insert(brain_id.clone());

        let mut analysis = match timeout(self.config.intent_timeout, analyzer.analyze(text, context))
            .await
        {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => {
                warn!(brain = %brain_id, "Intent analysis failed: {}", e);
                return PhaseReport::abort(format!("intent analysis failed: {}", e));
            }
            Err(_) => {
                warn!(brain = %brain_id, "Intent analysis timed out");
                return PhaseReport::abort(format!(
                    "intent analysis timed out after {}ms",
                    self.config.intent_timeout.as_millis()
                ));
            }
        };

        if !analysis.overall_confidence.is_finite() {
            return PhaseReport::abort("intent analysis returned a non-finite confidence");
        }
        analysis.overall_confidence = clamp_confidence(analysis.overall_confidence);
        lock(state).intent = Some(analysis.clone());

        let minimum = self.config.thresholds.intent_min_confidence;
        if analysis.overall_confidence < minimum {
            return PhaseReport {
                outcome: PhaseOutcome::Abort,
                value: Some(analysis.clone()),
                detail: Some(format!(
                    "intent confidence {:.2} is below the minimum {:.2}",
                    analysis.overall_confidence, minimum
                )),
            };
        }

        debug!(
            confidence = analysis.overall_confidence,
            risk = analysis.risk_level.as_str(),
            requirements = analysis.technical_requirements.len(),
            "Intent analyzed"
        );
        PhaseReport::success(analysis)
    }

    /// Phase 2. Best effort: any problem degrades to `Partial`.
    pub(super) async fn planning_phase(
        &self,
        intent: &IntentAnalysis,
        context: Option<&RequestContext>,
        state: &Mutex<RoundState>,
    ) -> PhaseReport<TechnicalPlan> {
        let Some((brain_id, planner)) = self.registry.technical_planner() else {
            return PhaseReport::partial(None, "no active technical planner is registered");
        };
        lock(state).participants.insert(brain_id.clone());

        let mut plan = match timeout(self.config.planning_timeout, planner.plan(intent, context))
            .await
        {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => {
                warn!(brain = %brain_id, "Technical planning failed: {}", e);
                return PhaseReport::partial(None, format!("technical planning failed: {}", e));
            }
            Err(_) => {
                warn!(brain = %brain_id, "Technical planning timed out");
                return PhaseReport::partial(
                    None,
                    format!(
                        "technical planning timed out after {}ms",
                        self.config.planning_timeout.as_millis()
                    ),
                );
            }
        };

        if !plan.confidence.is_finite() {
            return PhaseReport::partial(None, "technical plan has a non-finite confidence");
        }
        plan.confidence = clamp_confidence(plan.confidence);
        lock(state).plan = Some(plan.clone());
        PhaseReport::success(plan)
    }

    /// Phase 3. Runs only for confident intents with at least one target.
    pub(super) async fn consultation_phase(
        &self,
        text: &str,
        intent: &IntentAnalysis,
        plan: Option<&TechnicalPlan>,
        state: &Mutex<RoundState>,
        progress: &dyn CoordinationProgress,
    ) -> PhaseReport<ConsultationResult> {
        let threshold = self.config.thresholds.consultation;
        if intent.overall_confidence < threshold {
            return PhaseReport::partial(
                None,
                format!(
                    "intent confidence {:.2} is below the consultation threshold {:.2}",
                    intent.overall_confidence, threshold
                ),
            );
        }

        let targets = derive_targets(&intent.technical_requirements);
        if targets.is_empty() {
            return PhaseReport::partial(None, "no expert domain matches the requirements");
        }

        let pattern = self.config.pattern_override.unwrap_or_else(|| {
            let score = complexity_score(intent, plan, targets.len());
            debug!(complexity = score, "Complexity scored");
            pattern_for_complexity(score)
        });

        let request =
            match ConsultationRequest::new(text, pattern, targets, self.config.consultation_budget)
            {
                Ok(request) => request,
                Err(e) => return PhaseReport::partial(None, e.to_string()),
            };

        let result = match self
            .orchestrator
            .orchestrate_with_progress(&request, progress)
            .await
        {
            Ok(result) => result,
            Err(e) => self.direct_consultation(&request, e, progress).await,
        };

        {
            let mut state = lock(state);
            state.participants.extend(result.participants.iter().cloned());
            state.consultation = Some(result.clone());
        }

        if let Some(reason) = &result.fallback_reason {
            let detail = format!("fallback: {}", reason);
            return PhaseReport::partial(Some(result), detail);
        }
        if !result.failed_domains.is_empty() {
            let detail = format!("{} domain(s) failed", result.failed_domains.len());
            return PhaseReport::partial(Some(result), detail);
        }
        PhaseReport::success(result)
    }

    /// Pattern-less parallel calls used when the orchestrator errors. The
    /// answers are kept as alternatives without resolution.
    async fn direct_consultation(
        &self,
        request: &ConsultationRequest,
        error: OrchestrationError,
        progress: &dyn CoordinationProgress,
    ) -> ConsultationResult {
        warn!("Orchestration failed, consulting experts directly: {}", error);
        let started = Instant::now();
        let queries = request
            .target_domains()
            .into_iter()
            .map(|domain| request.query_for(domain, QueryContext::default()))
            .collect();

        let mut gathered = Gathered::default();
        gathered.record_all(
            self.orchestrator
                .consult_batch(queries, started + request.budget(), progress)
                .await,
        );
        let Gathered {
            recommendations,
            failed,
            participants,
            ..
        } = gathered;

        let reason = error.to_string();
        let lead = request
            .target_domains()
            .first()
            .copied()
            .unwrap_or(ExpertDomain::ALL[0]);
        let resolved = ResolvedRecommendation::fallback(
            lead,
            reason.clone(),
            recommendations.values().cloned().collect(),
        );

        ConsultationResult::new(
            ConsultationPattern::Parallel,
            recommendations,
            failed.into_values().collect(),
            resolved,
            started.elapsed().as_millis() as u64,
        )
        .with_participants(participants.into_iter().collect())
        .with_fallback_reason(reason)
    }

    /// Phase 4. Weighted breakdown plus a generic aggregation diagnostic.
    pub(super) fn aggregation_phase(
        &self,
        text: &str,
        intent: &IntentAnalysis,
        plan: Option<&TechnicalPlan>,
        consultation: Option<&ConsultationResult>,
    ) -> PhaseReport<ConfidenceBreakdown> {
        let breakdown = self.breakdown_for(intent, plan, consultation);
        let weights = &self.config.weights;

        let mut scores = vec![ConfidenceScore::new(intent.overall_confidence, "intent")
            .with_weight(weights.intent)];
        if let Some(plan) = plan {
            scores.push(ConfidenceScore::new(plan.confidence, "planning").with_weight(weights.planning));
        }
        if !breakdown.domains.is_empty() {
            let share = weights.consultation / breakdown.domains.len() as f64;
            for (domain, confidence) in &breakdown.domains {
                scores.push(ConfidenceScore::new(*confidence, domain.as_str()).with_weight(share));
            }
        }

        let diagnostic =
            self.aggregator
                .aggregate(&scores, None, Some(&AggregationContext::new(text)));
        debug!(
            total = breakdown.total,
            diagnostic = diagnostic.value,
            method = %diagnostic.method,
            "Confidence aggregated"
        );
        PhaseReport::success(breakdown.with_diagnostic(diagnostic))
    }

    pub(super) fn breakdown_for(
        &self,
        intent: &IntentAnalysis,
        plan: Option<&TechnicalPlan>,
        consultation: Option<&ConsultationResult>,
    ) -> ConfidenceBreakdown {
        ConfidenceBreakdown::compute(
            intent.overall_confidence,
            plan.map(|p| p.confidence),
            consultation
                .map(|c| c.domain_confidences.clone())
                .unwrap_or_default(),
            &self.config.weights,
        )
    }

    /// Phase 5
    pub(super) fn decision_phase(
        &self,
        intent: &IntentAnalysis,
        breakdown: &ConfidenceBreakdown,
    ) -> PhaseReport<Decision> {
        let decision = self
            .config
            .thresholds
            .decide(breakdown.total, intent.risk_level);
        info!(
            decision = %decision,
            confidence = breakdown.total,
            "Decision made"
        );
        PhaseReport::success(decision)
    }

    /// Phase 6. Called for approved rounds only.
    pub(super) fn execution_phase(
        &self,
        plan: Option<&TechnicalPlan>,
        consultation: Option<&ConsultationResult>,
    ) -> PhaseReport<ExecutionPlan> {
        let execution = ExecutionPlan::merge(plan, consultation);
        if execution.is_empty() {
            return PhaseReport::partial(Some(execution), "no executable steps");
        }
        PhaseReport::success(execution)
    }
}
