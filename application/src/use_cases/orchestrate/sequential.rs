//! Sequential pattern: influence order, one expert at a time.
//!
//! Each query carries highlights from the answers already given in this
//! round and the most recent entries of the orchestrator's history.

use super::{Gathered, Orchestrator};
use crate::ports::progress::CoordinationProgress;
use synapse_domain::consultation::{
    MAX_HIGHLIGHTS, MAX_HISTORY, extract_highlights, recent_history, sequential_order,
};
use synapse_domain::{ConsultationRequest, DomainRecommendation, QueryContext};
use tokio::time::Instant;
use tracing::debug;

impl Orchestrator {
    pub(super) async fn run_sequential(
        &self,
        request: &ConsultationRequest,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Gathered {
        let order = sequential_order(&request.target_domains());
        let per_query = request.budget() / order.len().max(1) as u32;
        let history = self.history_snapshot();

        debug!(
            order = ?order.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
            "Sequential consultation order"
        );

        let mut gathered = Gathered::default();
        let mut prior: Vec<DomainRecommendation> = Vec::new();

        for domain in order {
            let context = QueryContext {
                highlights: extract_highlights(&prior, MAX_HIGHLIGHTS),
                history: recent_history(&history, MAX_HISTORY),
                ..QueryContext::default()
            };
            let query_deadline = (Instant::now() + per_query).min(deadline);
            let calls = self
                .consult_batch(vec![request.query_for(domain, context)], query_deadline, progress)
                .await;

            for call in calls {
                if let Ok(rec) = &call.outcome {
                    prior.push(rec.clone());
                }
                gathered.record(call);
            }
        }

        gathered
    }
}
