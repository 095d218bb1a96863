//! Sub-goal strategy table for approach-clash detection.

use crate::util::term_set;
use std::collections::BTreeSet;

/// A recognized sub-goal and the named strategies for reaching it.
#[derive(Debug, Clone, Copy)]
pub struct ApproachRule {
    pub sub_goal: &'static str,
    /// Terms that show a text addresses the sub-goal
    pub goal_terms: &'static [&'static str],
    /// `(strategy name, terms naming it)`
    pub strategies: &'static [(&'static str, &'static [&'static str])],
}

pub const APPROACH_RULES: &[ApproachRule] = &[
    ApproachRule {
        sub_goal: "monitoring",
        goal_terms: &["monitoring", "monitor", "observability", "metrics", "logs"],
        strategies: &[
            ("centralized", &["centralized", "centralised", "central"]),
            ("distributed", &["distributed", "decentralized", "federated"]),
        ],
    },
    ApproachRule {
        sub_goal: "scaling",
        goal_terms: &["scaling", "scale", "autoscaling", "capacity"],
        strategies: &[
            ("horizontal", &["horizontal", "horizontally", "scale_out"]),
            ("vertical", &["vertical", "vertically", "bigger_instances"]),
        ],
    },
    ApproachRule {
        sub_goal: "deployment",
        goal_terms: &["deployment", "deploy", "rollout", "release"],
        strategies: &[
            ("blue-green", &["blue_green", "bluegreen"]),
            ("canary", &["canary"]),
            ("rolling", &["rolling"]),
        ],
    },
    ApproachRule {
        sub_goal: "data replication",
        goal_terms: &["replication", "replicate", "replicas", "storage"],
        strategies: &[
            ("synchronous replication", &["sync_replication", "synchronous_replication"]),
            ("asynchronous replication", &["async_replication", "asynchronous_replication"]),
        ],
    },
    ApproachRule {
        sub_goal: "authentication",
        goal_terms: &["authentication", "login", "identity", "auth"],
        strategies: &[
            ("single sign-on", &["sso", "oidc", "saml"]),
            ("local accounts", &["password", "passwords", "local_accounts"]),
        ],
    },
];

/// Two texts address the same sub-goal with different named strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachClash {
    pub sub_goal: &'static str,
    pub first_strategy: &'static str,
    pub second_strategy: &'static str,
}

fn strategies_in(rule: &ApproachRule, terms: &BTreeSet<String>) -> Vec<&'static str> {
    rule.strategies
        .iter()
        .filter(|(_, names)| names.iter().any(|n| terms.contains(*n)))
        .map(|(strategy, _)| *strategy)
        .collect()
}

/// Find a sub-goal both texts address where each names a strategy the
/// other does not use.
pub fn find_approach_clash(a: &str, b: &str) -> Option<ApproachClash> {
    let terms_a = term_set(a);
    let terms_b = term_set(b);

    for rule in APPROACH_RULES {
        let addresses = |terms: &BTreeSet<String>| rule.goal_terms.iter().any(|t| terms.contains(*t));
        if !addresses(&terms_a) || !addresses(&terms_b) {
            continue;
        }

        let in_a = strategies_in(rule, &terms_a);
        let in_b = strategies_in(rule, &terms_b);

        let first = in_a.iter().copied().find(|s| !in_b.contains(s));
        let second = in_b.iter().copied().find(|s| !in_a.contains(s));

        if let (Some(first), Some(second)) = (first, second) {
            return Some(ApproachClash {
                sub_goal: rule.sub_goal,
                first_strategy: first,
                second_strategy: second,
            });
        }
    }
    None
}
