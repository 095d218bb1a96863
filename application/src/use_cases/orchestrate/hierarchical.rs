//! Hierarchical pattern: priority tiers, most urgent first.
//!
//! Each tier runs in parallel with `remaining / tiers left` of the budget
//! and sees the insights of every earlier tier.

use super::{Gathered, Orchestrator};
use crate::ports::progress::CoordinationProgress;
use std::collections::BTreeMap;
use synapse_domain::consultation::priority_tiers;
use synapse_domain::{ConsultationRequest, ExpertDomain, QueryContext};
use tokio::time::Instant;
use tracing::debug;

impl Orchestrator {
    pub(super) async fn run_hierarchical(
        &self,
        request: &ConsultationRequest,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Gathered {
        let tiers = priority_tiers(request);
        let total = tiers.len();
        let mut insights: BTreeMap<ExpertDomain, String> = BTreeMap::new();
        let mut gathered = Gathered::default();

        for (index, (tier, domains)) in tiers.into_iter().enumerate() {
            let now = Instant::now();
            let remaining = deadline.saturating_duration_since(now);
            let tier_deadline = now + remaining / (total - index) as u32;
            debug!(%tier, domains = domains.len(), "Consulting priority tier");

            let queries = domains
                .into_iter()
                .map(|domain| {
                    let context = QueryContext {
                        shared_insights: insights.clone(),
                        ..QueryContext::default()
                    };
                    request.query_for(domain, context)
                })
                .collect();

            for call in self.consult_batch(queries, tier_deadline, progress).await {
                if let Ok(rec) = &call.outcome {
                    insights.insert(call.domain, rec.summary());
                }
                gathered.record(call);
            }
        }

        gathered
    }
}
