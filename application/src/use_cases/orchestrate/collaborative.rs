//! Collaborative pattern: an initial parallel round, then rounds in which
//! every domain is re-queried with insights from strongly related domains.

use super::{Gathered, Orchestrator};
use crate::ports::progress::CoordinationProgress;
use std::collections::BTreeMap;
use synapse_domain::consultation::collaborators;
use synapse_domain::{ConsultationRequest, ExpertDomain, QueryContext};
use tokio::time::Instant;
use tracing::debug;

impl Orchestrator {
    pub(super) async fn run_collaborative(
        &self,
        request: &ConsultationRequest,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Gathered {
        let domains = request.target_domains();
        let rounds = self.config.collaboration_rounds;
        let slice = request.budget() / (rounds as u32 + 1);

        let mut gathered = Gathered::default();
        let queries = domains
            .iter()
            .map(|domain| request.query_for(*domain, QueryContext::default()))
            .collect();
        let round_deadline = (Instant::now() + slice).min(deadline);
        gathered.record_all(self.consult_batch(queries, round_deadline, progress).await);

        for round in 1..=rounds {
            if gathered.recommendations.is_empty() || Instant::now() >= deadline {
                break;
            }
            let answered: Vec<ExpertDomain> = gathered.recommendations.keys().copied().collect();
            debug!(round, answered = answered.len(), "Collaboration round");

            let queries = domains
                .iter()
                .map(|domain| {
                    let shared_insights: BTreeMap<ExpertDomain, String> =
                        collaborators(*domain, &answered)
                            .into_iter()
                            .filter_map(|other| {
                                gathered
                                    .recommendations
                                    .get(&other)
                                    .map(|rec| (other, rec.summary()))
                            })
                            .collect();
                    let context = QueryContext {
                        shared_insights,
                        round,
                        ..QueryContext::default()
                    };
                    request.query_for(*domain, context)
                })
                .collect();

            let round_deadline = (Instant::now() + slice).min(deadline);
            gathered.record_all(self.consult_batch(queries, round_deadline, progress).await);
        }

        gathered
    }
}
