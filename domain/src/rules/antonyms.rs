//! Closed antonym table for contradiction detection.

use crate::util::term_set;

/// Opposing terms. Multi-word terms are written with `_` and match adjacent
/// words ("scale up" matches `scale_up`).
pub const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("enable", "disable"),
    ("allow", "deny"),
    ("public", "private"),
    ("encrypted", "unencrypted"),
    ("centralized", "distributed"),
    ("scale_up", "scale_down"),
    ("increase", "decrease"),
    ("synchronous", "asynchronous"),
    ("stateful", "stateless"),
    ("open", "close"),
    ("add", "remove"),
    ("manual", "automated"),
    ("monolith", "microservices"),
    ("single_region", "multi_region"),
];

/// Find an antonym pair split across two texts: one side appears in `a`
/// and the other in `b`. Returns the pair as `(term in a, term in b)`.
pub fn find_contradiction(a: &str, b: &str) -> Option<(&'static str, &'static str)> {
    let terms_a = term_set(a);
    let terms_b = term_set(b);

    for (left, right) in ANTONYM_PAIRS {
        if terms_a.contains(*left) && terms_b.contains(*right) {
            return Some((*left, *right));
        }
        if terms_a.contains(*right) && terms_b.contains(*left) {
            return Some((*right, *left));
        }
    }
    None
}
