//! Conflict resolver: detects pairwise conflicts and merges per-domain
//! recommendations into one [`ResolvedRecommendation`].
//!
//! Strategy selection runs over the full conflict set in this order:
//!
//! | Condition                                     | Strategy            |
//! |-----------------------------------------------|---------------------|
//! | no conflicts                                  | consensus (max)     |
//! | a conflict touches the top domain present     | domain priority     |
//! | any high-impact conflict                      | risk minimization   |
//! | confidence spread above 0.2                   | highest confidence  |
//! | any contradictory conflict                    | hybrid              |
//! | otherwise                                     | consensus (mean)    |

use super::conflict::{ConflictKind, ConflictRecord, ImpactLevel};
use super::detector::detect_conflicts;
use super::error::ResolutionError;
use super::strategy::{ResolutionPhase, ResolutionStrategy, ResolvedRecommendation};
use crate::consultation::domain::ExpertDomain;
use crate::consultation::recommendation::DomainRecommendation;
use crate::core::confidence::mean;
use crate::util::{first_sentence, normalize_text, push_unique};
use std::collections::{BTreeMap, BTreeSet};

/// Spread above which the most confident answer wins outright
pub const CONFIDENCE_SPREAD_THRESHOLD: f64 = 0.2;

type Recommendations = BTreeMap<ExpertDomain, DomainRecommendation>;

/// Stateless, deterministic resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    /// Merge the recommendations of one consultation round.
    ///
    /// Fails on an empty map, a non-finite or out-of-range confidence, or a
    /// map entry keyed under a different domain than it claims.
    pub fn resolve(
        &self,
        recommendations: &Recommendations,
    ) -> Result<ResolvedRecommendation, ResolutionError> {
        validate(recommendations)?;

        let conflicts = detect_conflicts(recommendations);
        let strategy = self.select_strategy(recommendations, &conflicts);

        let mut resolved = match strategy {
            ResolutionStrategy::DomainPriority => domain_priority(recommendations, &conflicts)?,
            ResolutionStrategy::RiskMinimization => risk_minimization(recommendations)?,
            ResolutionStrategy::HighestConfidence => {
                highest_confidence(recommendations, &conflicts)?
            }
            ResolutionStrategy::Hybrid => hybrid(recommendations, &conflicts)?,
            ResolutionStrategy::ConsensusBuilding => {
                consensus_building(recommendations, &conflicts)?
            }
            ResolutionStrategy::Fallback => return Err(ResolutionError::NoCandidate("fallback")),
        };

        resolved.conflicts = conflicts;
        Ok(resolved)
    }

    /// Pick the strategy for a conflict set
    pub fn select_strategy(
        &self,
        recommendations: &Recommendations,
        conflicts: &[ConflictRecord],
    ) -> ResolutionStrategy {
        if conflicts.is_empty() {
            return ResolutionStrategy::ConsensusBuilding;
        }

        if let Some(top) = recommendations.keys().next()
            && conflicts.iter().any(|c| c.involves(*top))
        {
            return ResolutionStrategy::DomainPriority;
        }

        if conflicts.iter().any(|c| c.impact == ImpactLevel::High) {
            return ResolutionStrategy::RiskMinimization;
        }

        if confidence_spread(recommendations) > CONFIDENCE_SPREAD_THRESHOLD {
            return ResolutionStrategy::HighestConfidence;
        }

        if conflicts.iter().any(|c| c.kind == ConflictKind::Contradictory) {
            return ResolutionStrategy::Hybrid;
        }

        ResolutionStrategy::ConsensusBuilding
    }
}

fn validate(recommendations: &Recommendations) -> Result<(), ResolutionError> {
    if recommendations.is_empty() {
        return Err(ResolutionError::Empty);
    }
    for (key, rec) in recommendations {
        if !rec.confidence.is_finite() || !(0.0..=1.0).contains(&rec.confidence) {
            return Err(ResolutionError::InvalidConfidence {
                domain: *key,
                value: rec.confidence,
            });
        }
        if rec.domain != *key {
            return Err(ResolutionError::DomainMismatch {
                key: *key,
                actual: rec.domain,
            });
        }
    }
    Ok(())
}

fn confidence_spread(recommendations: &Recommendations) -> f64 {
    let max = recommendations
        .values()
        .map(|r| r.confidence)
        .fold(f64::MIN, f64::max);
    let min = recommendations
        .values()
        .map(|r| r.confidence)
        .fold(f64::MAX, f64::min);
    (max - min).max(0.0)
}

fn union_into(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        push_unique(target, item);
    }
}

fn others(recommendations: &Recommendations, chosen: ExpertDomain) -> Vec<DomainRecommendation> {
    recommendations
        .values()
        .filter(|r| r.domain != chosen)
        .cloned()
        .collect()
}

fn domain_priority(
    recommendations: &Recommendations,
    conflicts: &[ConflictRecord],
) -> Result<ResolvedRecommendation, ResolutionError> {
    let (top, lead) = recommendations
        .iter()
        .next()
        .ok_or(ResolutionError::NoCandidate("domain_priority"))?;
    let top = *top;

    let contradicting: BTreeSet<ExpertDomain> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::Contradictory)
        .filter_map(|c| c.counterpart(top))
        .collect();

    let mut primary = lead.clone();
    let mut seen: BTreeSet<String> = primary
        .implementation_steps
        .iter()
        .map(|s| normalize_text(s))
        .collect();
    let mut merged_from = Vec::new();
    let mut mitigations = Vec::new();

    for (domain, rec) in recommendations.iter().skip(1) {
        if contradicting.contains(domain) {
            mitigations.push(format!(
                "Revisit the {} recommendation, it contradicts {}",
                domain, top
            ));
            continue;
        }
        let mut added = false;
        for step in &rec.implementation_steps {
            let key = normalize_text(step);
            if key.is_empty() || !seen.insert(key) {
                continue;
            }
            primary
                .implementation_steps
                .push(format!("[{}] {}", domain, step.trim()));
            added = true;
        }
        if added {
            merged_from.push(domain.as_str());
        }
    }

    let mut reasoning = format!(
        "{} has the highest priority among {} recommendations and conflicts were detected; its recommendation is kept",
        top,
        recommendations.len()
    );
    if !merged_from.is_empty() {
        reasoning.push_str(&format!(
            ", with compatible steps merged from {}",
            merged_from.join(", ")
        ));
    }

    Ok(ResolvedRecommendation {
        confidence: primary.confidence,
        primary,
        alternatives: others(recommendations, top),
        strategy: ResolutionStrategy::DomainPriority,
        reasoning,
        risk_mitigations: mitigations,
        conflicts: Vec::new(),
        phases: Vec::new(),
    })
}

fn risk_minimization(
    recommendations: &Recommendations,
) -> Result<ResolvedRecommendation, ResolutionError> {
    let chosen = recommendations
        .values()
        .min_by(|a, b| {
            a.risks
                .len()
                .cmp(&b.risks.len())
                .then_with(|| b.confidence.total_cmp(&a.confidence))
                .then_with(|| a.domain.cmp(&b.domain))
        })
        .ok_or(ResolutionError::NoCandidate("risk_minimization"))?;

    let mut mitigations = Vec::new();
    for rec in recommendations.values().filter(|r| r.domain != chosen.domain) {
        for risk in &rec.risks {
            push_unique(&mut mitigations, &format!("[{}] {}", rec.domain, risk.trim()));
        }
    }

    Ok(ResolvedRecommendation {
        primary: chosen.clone(),
        alternatives: others(recommendations, chosen.domain),
        strategy: ResolutionStrategy::RiskMinimization,
        confidence: chosen.confidence,
        reasoning: format!(
            "High-impact conflicts detected; chose {} as it carries the fewest risks ({})",
            chosen.domain,
            chosen.risks.len()
        ),
        risk_mitigations: mitigations,
        conflicts: Vec::new(),
        phases: Vec::new(),
    })
}

fn highest_confidence(
    recommendations: &Recommendations,
    conflicts: &[ConflictRecord],
) -> Result<ResolvedRecommendation, ResolutionError> {
    let chosen = recommendations
        .values()
        .max_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then_with(|| b.domain.cmp(&a.domain))
        })
        .ok_or(ResolutionError::NoCandidate("highest_confidence"))?;

    let mitigations = conflicts
        .iter()
        .filter_map(|c| {
            c.counterpart(chosen.domain)
                .map(|other| format!("Check the {} concern against {}: {}", other, chosen.domain, c.description))
        })
        .collect();

    Ok(ResolvedRecommendation {
        primary: chosen.clone(),
        alternatives: others(recommendations, chosen.domain),
        strategy: ResolutionStrategy::HighestConfidence,
        confidence: chosen.confidence,
        reasoning: format!(
            "Confidence spread exceeds {:.1}; chose the most confident recommendation from {} ({:.2})",
            CONFIDENCE_SPREAD_THRESHOLD, chosen.domain, chosen.confidence
        ),
        risk_mitigations: mitigations,
        conflicts: Vec::new(),
        phases: Vec::new(),
    })
}

fn hybrid(
    recommendations: &Recommendations,
    conflicts: &[ConflictRecord],
) -> Result<ResolvedRecommendation, ResolutionError> {
    let involved: BTreeSet<ExpertDomain> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::Contradictory)
        .flat_map(|c| [c.domains.0, c.domains.1])
        .collect();

    let mut phases = Vec::with_capacity(involved.len());
    for domain in &involved {
        let rec = recommendations
            .get(domain)
            .ok_or(ResolutionError::NoCandidate("hybrid"))?;
        phases.push(ResolutionPhase {
            order: phases.len() + 1,
            domain: *domain,
            description: rec.description.clone(),
            steps: rec.implementation_steps.clone(),
        });
    }

    let last = phases
        .last_mut()
        .ok_or(ResolutionError::NoCandidate("hybrid"))?;
    for (domain, rec) in recommendations.iter().filter(|(d, _)| !involved.contains(*d)) {
        for step in &rec.implementation_steps {
            push_unique(&mut last.steps, &format!("[{}] {}", domain, step.trim()));
        }
    }

    let lead = phases[0].domain;
    let description = phases
        .iter()
        .map(|p| {
            format!(
                "Phase {} ({}): {}",
                p.order,
                p.domain,
                first_sentence(&p.description, 160)
            )
        })
        .collect::<Vec<_>>()
        .join("; ");
    let confidence = mean(
        &recommendations
            .values()
            .map(|r| r.confidence)
            .collect::<Vec<_>>(),
    );

    let mut primary = DomainRecommendation::new(lead, confidence, description);
    for phase in &phases {
        for step in &phase.steps {
            primary
                .implementation_steps
                .push(format!("Phase {}: {}", phase.order, step));
        }
    }
    for rec in recommendations.values() {
        union_into(&mut primary.risks, &rec.risks);
        union_into(&mut primary.dependencies, &rec.dependencies);
        union_into(&mut primary.resources, &rec.resources);
        primary.effort = primary.effort.max(rec.effort);
    }

    let mitigations = phases
        .windows(2)
        .map(|pair| {
            format!(
                "Monitor the transition from phase {} ({}) to phase {} ({})",
                pair[0].order, pair[0].domain, pair[1].order, pair[1].domain
            )
        })
        .collect();

    Ok(ResolvedRecommendation {
        primary,
        alternatives: recommendations.values().cloned().collect(),
        strategy: ResolutionStrategy::Hybrid,
        confidence,
        reasoning: format!(
            "Contradictory recommendations from {} are addressed in {} sequential phases",
            involved
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            phases.len()
        ),
        risk_mitigations: mitigations,
        conflicts: Vec::new(),
        phases,
    })
}

fn consensus_building(
    recommendations: &Recommendations,
    conflicts: &[ConflictRecord],
) -> Result<ResolvedRecommendation, ResolutionError> {
    let lead = *recommendations
        .keys()
        .next()
        .ok_or(ResolutionError::NoCandidate("consensus_building"))?;

    let confidences: Vec<f64> = recommendations.values().map(|r| r.confidence).collect();
    let harmonious = conflicts.is_empty();
    let confidence = if harmonious {
        confidences.iter().copied().fold(0.0, f64::max)
    } else {
        mean(&confidences)
    };

    let description = recommendations
        .values()
        .map(|r| format!("[{}] {}", r.domain, r.description.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut primary = DomainRecommendation::new(lead, confidence, description);
    primary.effort = recommendations
        .values()
        .map(|r| r.effort)
        .max()
        .unwrap_or_default();
    for rec in recommendations.values() {
        union_into(&mut primary.implementation_steps, &rec.implementation_steps);
        union_into(&mut primary.dependencies, &rec.dependencies);
        union_into(&mut primary.risks, &rec.risks);
        union_into(&mut primary.resources, &rec.resources);
    }

    let mitigations = conflicts
        .iter()
        .map(|c| {
            let topic = if c.affected_areas.is_empty() {
                c.kind.as_str().to_string()
            } else {
                c.affected_areas.join(", ")
            };
            format!("Coordinate {} and {} on {}", c.domains.0, c.domains.1, topic)
        })
        .collect();

    let reasoning = if harmonious {
        format!(
            "All {} recommendations are compatible; merged with the strongest confidence",
            recommendations.len()
        )
    } else {
        format!(
            "{} minor conflict(s) across {} recommendations; merged with mean confidence",
            conflicts.len(),
            recommendations.len()
        )
    };

    Ok(ResolvedRecommendation {
        primary,
        alternatives: Vec::new(),
        strategy: ResolutionStrategy::ConsensusBuilding,
        confidence,
        reasoning,
        risk_mitigations: mitigations,
        conflicts: Vec::new(),
        phases: Vec::new(),
    })
}
