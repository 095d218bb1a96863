//! Conditional pattern: urgent targets first, then domains their answers
//! trigger.

use super::{Gathered, Orchestrator};
use crate::ports::progress::CoordinationProgress;
use synapse_domain::rules::triggered_domains;
use synapse_domain::{ConsultationRequest, ExpertDomain, QueryContext};
use tokio::time::Instant;
use tracing::{debug, info};

impl Orchestrator {
    pub(super) async fn run_conditional(
        &self,
        request: &ConsultationRequest,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Gathered {
        let urgent: Vec<ExpertDomain> = request
            .targets()
            .iter()
            .filter(|(_, priority)| priority.is_urgent())
            .map(|(domain, _)| *domain)
            .collect();
        let first_wave = if urgent.is_empty() {
            request.target_domains()
        } else {
            urgent
        };

        let wave_deadline = (Instant::now() + request.budget() / 2).min(deadline);
        let queries = first_wave
            .iter()
            .map(|domain| request.query_for(*domain, QueryContext::default()))
            .collect();

        let mut gathered = Gathered::default();
        gathered.record_all(self.consult_batch(queries, wave_deadline, progress).await);

        let texts: Vec<String> = gathered
            .recommendations
            .values()
            .map(|rec| rec.searchable_text())
            .collect();
        let triggered = triggered_domains(texts.iter().map(String::as_str));
        debug!(triggered = triggered.len(), "Trigger rules evaluated");

        let follow_up = request.budget() / 4;
        for domain in triggered {
            if gathered.attempted(domain) || !self.registry.has_expert_for(domain) {
                continue;
            }
            info!(%domain, "Consulting triggered domain");
            let call_deadline = (Instant::now() + follow_up).min(deadline);
            let calls = self
                .consult_batch(
                    vec![request.query_for(domain, QueryContext::default())],
                    call_deadline,
                    progress,
                )
                .await;
            gathered.record_all(calls);
        }

        for domain in request.target_domains() {
            if !gathered.attempted(domain) {
                debug!(%domain, "Target not consulted, skipped");
                gathered.skipped.insert(domain);
            }
        }

        gathered
    }
}
