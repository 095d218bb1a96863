//! Outline planner: one step per technical requirement.

use async_trait::async_trait;
use synapse_application::{BrainError, TechnicalPlanner};
use synapse_domain::rules::derive_targets;
use synapse_domain::{
    ExpertDomain, IntentAnalysis, PlanStep, RequestContext, RiskLevel, TechnicalPlan,
};

/// Minutes for the closing verification step
const VERIFY_MINUTES: u32 = 15;

/// Turns requirements into an ordered outline with rough durations
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlinePlanner;

impl OutlinePlanner {
    pub fn new() -> Self {
        Self
    }

    fn step_minutes(risk: RiskLevel) -> u32 {
        match risk {
            RiskLevel::Low => 20,
            RiskLevel::Medium => 30,
            RiskLevel::High => 45,
        }
    }

    fn resource_for(domain: ExpertDomain) -> &'static str {
        match domain {
            ExpertDomain::Security => "security review",
            ExpertDomain::Network => "network change window",
            ExpertDomain::Storage => "storage capacity",
            ExpertDomain::Orchestration => "deployment pipeline",
            ExpertDomain::ExternalServices => "vendor access",
            ExpertDomain::Monitoring => "dashboard and alert rules",
        }
    }
}

#[async_trait]
impl TechnicalPlanner for OutlinePlanner {
    async fn plan(
        &self,
        intent: &IntentAnalysis,
        context: Option<&RequestContext>,
    ) -> Result<TechnicalPlan, BrainError> {
        let minutes = Self::step_minutes(intent.risk_level);
        let mut steps: Vec<PlanStep> = intent
            .technical_requirements
            .iter()
            .map(|requirement| PlanStep::new(requirement.clone(), minutes))
            .collect();

        if steps.is_empty() {
            return Err(BrainError::Failed(
                "no technical requirement to plan".to_string(),
            ));
        }

        let environment = context
            .and_then(|c| c.environment.as_deref())
            .unwrap_or("staging");
        steps.push(PlanStep::new(
            format!("Verify the change in {}", environment),
            VERIFY_MINUTES,
        ));

        let resources = derive_targets(&intent.technical_requirements)
            .into_keys()
            .map(|domain| Self::resource_for(domain).to_string())
            .collect();

        // More concrete requirements give a more reliable outline
        let confidence = (0.5 + 0.08 * intent.technical_requirements.len() as f64).min(0.9);
        Ok(TechnicalPlan::new(confidence, steps).with_resources(resources))
    }
}
