//! Parallel pattern: every target at once under one shared deadline.

use super::{Gathered, Orchestrator};
use crate::ports::progress::CoordinationProgress;
use synapse_domain::{ConsultationRequest, QueryContext};
use tokio::time::Instant;

impl Orchestrator {
    pub(super) async fn run_parallel(
        &self,
        request: &ConsultationRequest,
        deadline: Instant,
        progress: &dyn CoordinationProgress,
    ) -> Gathered {
        let queries = request
            .target_domains()
            .into_iter()
            .map(|domain| request.query_for(domain, QueryContext::default()))
            .collect();

        let mut gathered = Gathered::default();
        gathered.record_all(self.consult_batch(queries, deadline, progress).await);
        gathered
    }
}
