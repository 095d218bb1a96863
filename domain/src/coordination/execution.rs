//! Execution plan assembled for approved rounds.

use super::intent::TechnicalPlan;
use crate::consultation::domain::ExpertDomain;
use crate::consultation::result::ConsultationResult;
use crate::util::first_sentence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where an execution step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "domain")]
pub enum StepSource {
    TechnicalPlan,
    Domain(ExpertDomain),
}

impl std::fmt::Display for StepSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepSource::TechnicalPlan => write!(f, "plan"),
            StepSource::Domain(domain) => write!(f, "{}", domain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStep {
    /// 1-based
    pub order: usize,
    pub source: StepSource,
    pub description: String,
    pub duration_minutes: u32,
}

/// Ordered steps with durations and the resources they need
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub steps: Vec<ExecutionStep>,
    /// Sorted, deduplicated
    pub resources: Vec<String>,
    pub total_duration_minutes: u32,
}

impl ExecutionPlan {
    /// Technical-plan steps first, then each consulted domain's steps in
    /// priority order. A domain's effort estimate is split evenly across
    /// its steps.
    pub fn merge(plan: Option<&TechnicalPlan>, consultation: Option<&ConsultationResult>) -> Self {
        let mut steps = Vec::new();
        let mut resources = BTreeSet::new();

        if let Some(plan) = plan {
            for step in &plan.steps {
                steps.push((StepSource::TechnicalPlan, step.description.clone(), step.duration_minutes));
            }
            resources.extend(plan.resource_requirements.iter().map(|r| r.trim().to_string()));
        }

        if let Some(consultation) = consultation {
            for (domain, rec) in &consultation.recommendations {
                let minutes = rec.effort.estimated_minutes();
                let descriptions: Vec<String> = if rec.implementation_steps.is_empty() {
                    vec![first_sentence(&rec.description, 160).to_string()]
                } else {
                    rec.implementation_steps.clone()
                };
                let count = descriptions.len() as u32;
                let per_step = (minutes / count).max(1);
                for description in descriptions {
                    steps.push((StepSource::Domain(*domain), description, per_step));
                }
                resources.extend(rec.resources.iter().map(|r| r.trim().to_string()));
            }
        }

        resources.retain(|r| !r.is_empty());

        let steps: Vec<ExecutionStep> = steps
            .into_iter()
            .enumerate()
            .map(|(i, (source, description, duration_minutes))| ExecutionStep {
                order: i + 1,
                source,
                description,
                duration_minutes,
            })
            .collect();
        let total_duration_minutes = steps.iter().map(|s| s.duration_minutes).sum();

        Self {
            steps,
            resources: resources.into_iter().collect(),
            total_duration_minutes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::recommendation::{DomainRecommendation, EffortLevel};
    use crate::consultation::request::ConsultationPattern;
    use crate::coordination::intent::PlanStep;
    use crate::resolution::ConflictResolver;
    use std::collections::BTreeMap;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_plan_and_domains() {
        let plan = TechnicalPlan::new(0.8, vec![PlanStep::new("Write manifests", 20)])
            .with_resources(strings(&["kubectl", "ci runner"]));

        let mut recs = BTreeMap::new();
        recs.insert(
            ExpertDomain::Orchestration,
            DomainRecommendation::new(ExpertDomain::Orchestration, 0.8, "Roll out gradually")
                .with_steps(strings(&["Set max surge", "Watch rollout"]))
                .with_effort(EffortLevel::High)
                .with_resources(strings(&["kubectl"])),
        );
        recs.insert(
            ExpertDomain::Security,
            DomainRecommendation::new(ExpertDomain::Security, 0.8, "Scan images. Then sign them.")
                .with_effort(EffortLevel::Low)
                .with_resources(strings(&["cosign"])),
        );
        let resolved = ConflictResolver::new().resolve(&recs).unwrap();
        let consultation =
            ConsultationResult::new(ConsultationPattern::Parallel, recs, vec![], resolved, 5);

        let merged = ExecutionPlan::merge(Some(&plan), Some(&consultation));

        let described: Vec<(String, u32)> = merged
            .steps
            .iter()
            .map(|s| (format!("{}: {}", s.source, s.description), s.duration_minutes))
            .collect();
        assert_eq!(
            described,
            vec![
                ("plan: Write manifests".to_string(), 20),
                ("security: Scan images".to_string(), 15),
                ("orchestration: Set max surge".to_string(), 30),
                ("orchestration: Watch rollout".to_string(), 30),
            ]
        );
        assert_eq!(merged.total_duration_minutes, 95);
        assert_eq!(merged.resources, strings(&["ci runner", "cosign", "kubectl"]));
        assert_eq!(merged.steps[3].order, 4);
    }

    #[test]
    fn test_merge_nothing() {
        let merged = ExecutionPlan::merge(None, None);
        assert!(merged.is_empty());
        assert_eq!(merged.total_duration_minutes, 0);
    }
}
