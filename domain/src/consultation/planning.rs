//! Scheduling helpers shared by the consultation patterns.
//!
//! These are pure functions over the rule tables so that orderings can be
//! tested without running a round.

use super::domain::{DomainPriority, ExpertDomain};
use super::recommendation::DomainRecommendation;
use super::request::ConsultationRequest;
use crate::rules::influence::{COLLABORATION_THRESHOLD, collaboration_strength, influencers};
use std::collections::BTreeSet;

/// Highlights carried into each sequential query
pub const MAX_HIGHLIGHTS: usize = 3;

/// History entries carried into each sequential query
pub const MAX_HISTORY: usize = 3;

/// Order domains so that every domain follows its in-scope influencers.
///
/// Among the domains that are ready, the one with the higher fixed
/// priority score goes first. If the remaining set has no ready domain
/// (a cycle), the highest-priority remaining domain is taken.
pub fn sequential_order(domains: &[ExpertDomain]) -> Vec<ExpertDomain> {
    let scope: BTreeSet<ExpertDomain> = domains.iter().copied().collect();
    let mut remaining = scope.clone();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().copied().find(|domain| {
            influencers(*domain)
                .iter()
                .all(|inf| !scope.contains(inf) || !remaining.contains(inf))
        });

        let next = match ready.or_else(|| remaining.iter().next().copied()) {
            Some(domain) => domain,
            None => break,
        };
        remaining.remove(&next);
        order.push(next);
    }

    order
}

/// Non-empty priority tiers of a request, most urgent first
pub fn priority_tiers(request: &ConsultationRequest) -> Vec<(DomainPriority, Vec<ExpertDomain>)> {
    DomainPriority::TIERS
        .iter()
        .filter_map(|tier| {
            let domains: Vec<ExpertDomain> = request
                .targets()
                .iter()
                .filter(|(_, p)| *p == tier)
                .map(|(d, _)| *d)
                .collect();
            (!domains.is_empty()).then_some((*tier, domains))
        })
        .collect()
}

/// Domains among `others` that collaborate strongly enough with `domain`
pub fn collaborators(domain: ExpertDomain, others: &[ExpertDomain]) -> Vec<ExpertDomain> {
    others
        .iter()
        .copied()
        .filter(|other| {
            *other != domain && collaboration_strength(domain, *other) > COLLABORATION_THRESHOLD
        })
        .collect()
}

/// Summaries of the most recent `limit` answers, oldest first
pub fn extract_highlights(prior: &[DomainRecommendation], limit: usize) -> Vec<String> {
    let start = prior.len().saturating_sub(limit);
    prior[start..].iter().map(|r| r.summary()).collect()
}

/// The last `limit` history entries, oldest first
pub fn recent_history(history: &[String], limit: usize) -> Vec<String> {
    let start = history.len().saturating_sub(limit);
    history[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::request::ConsultationPattern;
    use ExpertDomain::*;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn position(order: &[ExpertDomain], domain: ExpertDomain) -> usize {
        order.iter().position(|d| *d == domain).unwrap()
    }

    #[test]
    fn test_sequential_order_respects_influence() {
        let domains = [Monitoring, Orchestration, Storage, Network, Security, ExternalServices];
        let order = sequential_order(&domains);
        assert_eq!(order.len(), 6);

        for domain in order.iter() {
            for influencer in influencers(*domain) {
                assert!(position(&order, *influencer) < position(&order, *domain));
            }
        }
    }

    #[test]
    fn test_sequential_order_subsets() {
        // Exhaustive over every subset of the six domains
        for mask in 1u32..(1 << ExpertDomain::ALL.len()) {
            let subset: Vec<ExpertDomain> = ExpertDomain::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, d)| *d)
                .collect();
            let order = sequential_order(&subset);
            assert_eq!(order.len(), subset.len());

            for domain in &order {
                for influencer in influencers(*domain) {
                    if subset.contains(influencer) {
                        assert!(position(&order, *influencer) < position(&order, *domain));
                    }
                }
            }
        }
    }

    #[test]
    fn test_sequential_ties_by_priority() {
        // Neither influences the other; network outranks monitoring
        assert_eq!(sequential_order(&[Monitoring, Network]), vec![Network, Monitoring]);
    }

    #[test]
    fn test_priority_tiers() {
        let targets: BTreeMap<_, _> = [
            (Security, DomainPriority::Critical),
            (Monitoring, DomainPriority::Low),
            (Network, DomainPriority::Critical),
            (Storage, DomainPriority::Medium),
        ]
        .into_iter()
        .collect();
        let request = ConsultationRequest::new(
            "q",
            ConsultationPattern::Hierarchical,
            targets,
            Duration::from_secs(1),
        )
        .unwrap();

        let tiers = priority_tiers(&request);
        assert_eq!(
            tiers,
            vec![
                (DomainPriority::Critical, vec![Security, Network]),
                (DomainPriority::Medium, vec![Storage]),
                (DomainPriority::Low, vec![Monitoring]),
            ]
        );
    }

    #[test]
    fn test_collaborators() {
        let all = ExpertDomain::ALL;
        assert_eq!(
            collaborators(Security, &all),
            vec![Network, Storage, ExternalServices]
        );
        assert_eq!(collaborators(Monitoring, &all), vec![Orchestration]);
    }

    #[test]
    fn test_highlights_and_history_limits() {
        let prior: Vec<DomainRecommendation> = [Security, Network, Storage, Orchestration]
            .into_iter()
            .map(|d| DomainRecommendation::new(d, 0.8, format!("Advice for {}.", d)))
            .collect();

        let highlights = extract_highlights(&prior, MAX_HIGHLIGHTS);
        assert_eq!(highlights.len(), 3);
        assert_eq!(highlights[0], "[network] Advice for network");
        assert_eq!(highlights[2], "[orchestration] Advice for orchestration");

        let history: Vec<String> = (1..=5).map(|i| format!("entry {}", i)).collect();
        assert_eq!(
            recent_history(&history, MAX_HISTORY),
            vec!["entry 3", "entry 4", "entry 5"]
        );
        assert!(extract_highlights(&[], MAX_HIGHLIGHTS).is_empty());
    }
}
