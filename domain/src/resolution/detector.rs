//! Pairwise conflict detectors.
//!
//! For each unordered pair of domains the detectors run in a fixed order
//! and the first match wins:
//!
//! 1. contradictory: antonym split across the descriptions
//! 2. overlapping: shared steps (or, failing that, shared dependencies)
//! 3. priority: both high effort, or both high risk
//! 4. approach: same sub-goal, different named strategies

use super::conflict::{ConflictKind, ConflictRecord, ImpactLevel};
use crate::consultation::domain::ExpertDomain;
use crate::consultation::recommendation::DomainRecommendation;
use crate::core::confidence::HIGH_CONFIDENCE;
use crate::rules::antonyms::find_contradiction;
use crate::rules::approaches::find_approach_clash;
use crate::util::normalize_text;
use std::collections::{BTreeMap, BTreeSet};

/// Detect conflicts across every unordered pair, in priority order
pub fn detect_conflicts(
    recommendations: &BTreeMap<ExpertDomain, DomainRecommendation>,
) -> Vec<ConflictRecord> {
    let recs: Vec<&DomainRecommendation> = recommendations.values().collect();
    let mut conflicts = Vec::new();

    for (i, a) in recs.iter().enumerate() {
        for b in &recs[i + 1..] {
            if let Some(conflict) = detect_pair(a, b) {
                conflicts.push(conflict);
            }
        }
    }

    conflicts
}

/// Run the detectors on one pair, first match wins
pub fn detect_pair(a: &DomainRecommendation, b: &DomainRecommendation) -> Option<ConflictRecord> {
    contradiction(a, b)
        .or_else(|| overlap(a, b))
        .or_else(|| priority_clash(a, b))
        .or_else(|| approach_clash(a, b))
}

fn contradiction(a: &DomainRecommendation, b: &DomainRecommendation) -> Option<ConflictRecord> {
    let (term_a, term_b) = find_contradiction(&a.description, &b.description)?;

    let impact = if a.confidence >= HIGH_CONFIDENCE && b.confidence >= HIGH_CONFIDENCE {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    };

    Some(
        ConflictRecord::new(
            a.domain,
            b.domain,
            ConflictKind::Contradictory,
            impact,
            format!(
                "{} recommends '{}' while {} recommends '{}'",
                a.domain, term_a, b.domain, term_b
            ),
        )
        .with_affected_areas(vec![term_a.to_string(), term_b.to_string()]),
    )
}

fn shared(left: &[String], right: &[String]) -> Vec<String> {
    let right: BTreeSet<String> = right.iter().map(|s| normalize_text(s)).collect();
    let mut seen = BTreeSet::new();
    left.iter()
        .filter(|s| {
            let key = normalize_text(s);
            !key.is_empty() && right.contains(&key) && seen.insert(key)
        })
        .map(|s| s.trim().to_string())
        .collect()
}

fn overlap(a: &DomainRecommendation, b: &DomainRecommendation) -> Option<ConflictRecord> {
    let steps = shared(&a.implementation_steps, &b.implementation_steps);
    if !steps.is_empty() {
        return Some(
            ConflictRecord::new(
                a.domain,
                b.domain,
                ConflictKind::Overlapping,
                ImpactLevel::Low,
                format!(
                    "{} and {} share {} implementation step(s)",
                    a.domain,
                    b.domain,
                    steps.len()
                ),
            )
            .with_affected_areas(steps),
        );
    }

    let dependencies = shared(&a.dependencies, &b.dependencies);
    if !dependencies.is_empty() {
        return Some(
            ConflictRecord::new(
                a.domain,
                b.domain,
                ConflictKind::Dependency,
                ImpactLevel::Low,
                format!(
                    "{} and {} depend on the same {} item(s)",
                    a.domain,
                    b.domain,
                    dependencies.len()
                ),
            )
            .with_affected_areas(dependencies),
        );
    }

    None
}

fn priority_clash(a: &DomainRecommendation, b: &DomainRecommendation) -> Option<ConflictRecord> {
    let both_high_effort = a.is_high_effort() && b.is_high_effort();
    let both_high_risk = a.is_high_risk() && b.is_high_risk();
    if !both_high_effort && !both_high_risk {
        return None;
    }

    let impact = if both_high_effort && both_high_risk {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    };

    let mut areas = Vec::new();
    if both_high_effort {
        areas.push("effort".to_string());
    }
    if both_high_risk {
        areas.push("risk".to_string());
    }

    Some(
        ConflictRecord::new(
            a.domain,
            b.domain,
            ConflictKind::Priority,
            impact,
            format!(
                "{} and {} both demand high {}",
                a.domain,
                b.domain,
                areas.join(" and ")
            ),
        )
        .with_affected_areas(areas),
    )
}

fn approach_clash(a: &DomainRecommendation, b: &DomainRecommendation) -> Option<ConflictRecord> {
    let clash = find_approach_clash(&a.searchable_text(), &b.searchable_text())?;

    Some(
        ConflictRecord::new(
            a.domain,
            b.domain,
            ConflictKind::Approach,
            ImpactLevel::Medium,
            format!(
                "{} approaches {} as {} while {} uses {}",
                a.domain, clash.sub_goal, clash.first_strategy, b.domain, clash.second_strategy
            ),
        )
        .with_affected_areas(vec![clash.sub_goal.to_string()]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::recommendation::EffortLevel;
    use ExpertDomain::*;

    fn rec(domain: ExpertDomain, confidence: f64, description: &str) -> DomainRecommendation {
        DomainRecommendation::new(domain, confidence, description)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_contradiction_high_impact_when_both_confident() {
        let a = rec(Security, 0.9, "Keep the admin panel private");
        let b = rec(Network, 0.8, "Make the admin panel public behind a CDN");

        let conflict = detect_pair(&a, &b).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Contradictory);
        assert_eq!(conflict.impact, ImpactLevel::High);
        assert_eq!(conflict.domains, (Security, Network));
        assert_eq!(conflict.affected_areas, strings(&["private", "public"]));
    }

    #[test]
    fn test_contradiction_medium_impact_when_unsure() {
        let a = rec(Security, 0.9, "Disable password login");
        let b = rec(Storage, 0.4, "Enable password login for the backup tool");
        assert_eq!(detect_pair(&a, &b).unwrap().impact, ImpactLevel::Medium);
    }

    #[test]
    fn test_contradiction_wins_over_overlap() {
        let a = rec(Security, 0.9, "Deny egress").with_steps(strings(&["Update rules"]));
        let b = rec(Network, 0.9, "Allow egress").with_steps(strings(&["update rules"]));
        assert_eq!(
            detect_pair(&a, &b).unwrap().kind,
            ConflictKind::Contradictory
        );
    }

    #[test]
    fn test_overlapping_steps() {
        let a = rec(Storage, 0.7, "Add replicas").with_steps(strings(&["Provision volumes", "Tag resources"]));
        let b = rec(Orchestration, 0.7, "Run a statefulset").with_steps(strings(&["tag  resources"]));

        let conflict = detect_pair(&a, &b).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Overlapping);
        assert_eq!(conflict.impact, ImpactLevel::Low);
        assert_eq!(conflict.affected_areas, strings(&["Tag resources"]));
    }

    #[test]
    fn test_shared_dependency() {
        let a = rec(Storage, 0.7, "Snapshot volumes").with_dependencies(strings(&["terraform"]));
        let b = rec(Monitoring, 0.7, "Scrape exporters").with_dependencies(strings(&["Terraform"]));
        assert_eq!(detect_pair(&a, &b).unwrap().kind, ConflictKind::Dependency);
    }

    #[test]
    fn test_priority_clash() {
        let a = rec(Network, 0.7, "Rebuild the VPC").with_effort(EffortLevel::High);
        let b = rec(Storage, 0.7, "Migrate to a new engine").with_effort(EffortLevel::High);
        let conflict = detect_pair(&a, &b).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Priority);
        assert_eq!(conflict.impact, ImpactLevel::Medium);

        let risks = strings(&["r1", "r2", "r3"]);
        let a = a.with_risks(risks.clone());
        let b = b.with_risks(risks);
        assert_eq!(detect_pair(&a, &b).unwrap().impact, ImpactLevel::High);
    }

    #[test]
    fn test_approach_clash() {
        let a = rec(Orchestration, 0.7, "Handle scaling horizontally with more pods");
        let b = rec(Storage, 0.7, "Scale the database vertically");
        let conflict = detect_pair(&a, &b).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Approach);
        assert_eq!(conflict.affected_areas, strings(&["scaling"]));
    }

    #[test]
    fn test_no_conflict() {
        let a = rec(Security, 0.9, "Rotate credentials quarterly");
        let b = rec(Network, 0.85, "Pin upstream resolvers");
        assert!(detect_pair(&a, &b).is_none());
    }

    #[test]
    fn test_detect_conflicts_all_pairs() {
        let mut recs = BTreeMap::new();
        recs.insert(Security, rec(Security, 0.9, "Keep storage private"));
        recs.insert(Network, rec(Network, 0.9, "Pin upstream resolvers"));
        recs.insert(Storage, rec(Storage, 0.9, "Make the bucket public"));

        let conflicts = detect_conflicts(&recs);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].domains, (Security, Storage));
    }
}
