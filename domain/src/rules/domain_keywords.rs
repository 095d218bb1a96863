//! Requirement keyword → target domain table.

use crate::consultation::domain::{DomainPriority, ExpertDomain};
use crate::util::mentions_stem;
use std::collections::BTreeMap;

/// One keyword rule: a requirement containing `keyword` targets `domain`
/// with at least `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub domain: ExpertDomain,
    pub priority: DomainPriority,
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        mentions_stem(text, self.keyword)
    }
}

const fn rule(keyword: &'static str, domain: ExpertDomain, priority: DomainPriority) -> KeywordRule {
    KeywordRule {
        keyword,
        domain,
        priority,
    }
}

use DomainPriority::{Critical, High, Low, Medium};
use ExpertDomain::{ExternalServices, Monitoring, Network, Orchestration, Security, Storage};

/// Keyword table. Keywords are stems matched at word starts, so `encrypt`
/// covers "encryption" while `api` does not match "rapid".
pub const DOMAIN_KEYWORD_RULES: &[KeywordRule] = &[
    rule("security", Security, Critical),
    rule("encrypt", Security, Critical),
    rule("vulnerab", Security, Critical),
    rule("compliance", Security, High),
    rule("authent", Security, High),
    rule("authoriz", Security, High),
    rule("oauth", Security, High),
    rule("secret", Security, High),
    rule("firewall", Security, High),
    rule("permission", Security, Medium),
    rule("network", Network, High),
    rule("vpc", Network, High),
    rule("load balanc", Network, High),
    rule("ingress", Network, Medium),
    rule("dns", Network, Medium),
    rule("latency", Network, Medium),
    rule("database", Storage, High),
    rule("backup", Storage, High),
    rule("storage", Storage, Medium),
    rule("volume", Storage, Medium),
    rule("persist", Storage, Medium),
    rule("deploy", Orchestration, High),
    rule("kubernetes", Orchestration, High),
    rule("container", Orchestration, Medium),
    rule("scal", Orchestration, Medium),
    rule("cluster", Orchestration, Medium),
    rule("third-party", ExternalServices, High),
    rule("integration", ExternalServices, Medium),
    rule("cloud", ExternalServices, Medium),
    rule("aws", ExternalServices, Medium),
    rule("azure", ExternalServices, Medium),
    rule("api", ExternalServices, Low),
    rule("monitor", Monitoring, Medium),
    rule("alert", Monitoring, Medium),
    rule("observab", Monitoring, Medium),
    rule("metric", Monitoring, Low),
    rule("logging", Monitoring, Low),
];

/// Derive target domains and their priorities from technical requirements.
///
/// A domain matched by several rules keeps the most urgent priority.
pub fn derive_targets(requirements: &[String]) -> BTreeMap<ExpertDomain, DomainPriority> {
    let mut targets: BTreeMap<ExpertDomain, DomainPriority> = BTreeMap::new();

    for requirement in requirements {
        for rule in DOMAIN_KEYWORD_RULES {
            if rule.matches(requirement) {
                targets
                    .entry(rule.domain)
                    .and_modify(|p| *p = (*p).min(rule.priority))
                    .or_insert(rule.priority);
            }
        }
    }

    targets
}
