//! Influence graph and collaboration strengths between domains.

use crate::consultation::domain::ExpertDomain;
use ExpertDomain::{ExternalServices, Monitoring, Network, Orchestration, Security, Storage};

/// Strength above which two domains share insights in collaborative rounds
pub const COLLABORATION_THRESHOLD: f64 = 0.7;

/// Strength for pairs absent from [`COLLABORATION_STRENGTHS`]
const DEFAULT_STRENGTH: f64 = 0.5;

/// `domain` is influenced by every domain in the list and is scheduled
/// after those of them that are in scope. The graph is acyclic.
const INFLUENCED_BY: &[(ExpertDomain, &[ExpertDomain])] = &[
    (Security, &[]),
    (Network, &[Security]),
    (Storage, &[Security]),
    (Orchestration, &[Network, Storage]),
    (ExternalServices, &[Security, Network]),
    (Monitoring, &[Orchestration, ExternalServices]),
];

/// Symmetric pairwise collaboration strengths
const COLLABORATION_STRENGTHS: &[(ExpertDomain, ExpertDomain, f64)] = &[
    (Security, Network, 0.9),
    (Security, Storage, 0.8),
    (Security, ExternalServices, 0.75),
    (Security, Monitoring, 0.7),
    (Network, Orchestration, 0.8),
    (Network, ExternalServices, 0.75),
    (Storage, Orchestration, 0.75),
    (Orchestration, Monitoring, 0.85),
    (ExternalServices, Monitoring, 0.6),
];

/// Domains that influence `domain`
pub fn influencers(domain: ExpertDomain) -> &'static [ExpertDomain] {
    INFLUENCED_BY
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

/// Collaboration strength between two domains (`1.0` for the same domain)
pub fn collaboration_strength(a: ExpertDomain, b: ExpertDomain) -> f64 {
    if a == b {
        return 1.0;
    }
    COLLABORATION_STRENGTHS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, s)| *s)
        .unwrap_or(DEFAULT_STRENGTH)
}
