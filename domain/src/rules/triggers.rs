//! Answer term → additional domain table for conditional consultation.

use crate::consultation::domain::ExpertDomain;
use crate::util::mentions_stem;
use std::collections::BTreeSet;

/// Any of `terms` appearing in an answer pulls `domain` into the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRule {
    pub terms: &'static [&'static str],
    pub domain: ExpertDomain,
}

pub const TRIGGER_RULES: &[TriggerRule] = &[
    TriggerRule {
        terms: &["security"],
        domain: ExpertDomain::Security,
    },
    TriggerRule {
        terms: &["monitor", "alert"],
        domain: ExpertDomain::Monitoring,
    },
    TriggerRule {
        terms: &["cloud", "aws", "azure"],
        domain: ExpertDomain::ExternalServices,
    },
];

/// Domains triggered by any of the given texts (stems at word starts)
pub fn triggered_domains<'a>(texts: impl IntoIterator<Item = &'a str>) -> BTreeSet<ExpertDomain> {
    let mut domains = BTreeSet::new();
    for text in texts {
        for rule in TRIGGER_RULES {
            if rule.terms.iter().any(|term| mentions_stem(text, term)) {
                domains.insert(rule.domain);
            }
        }
    }
    domains
}
