//! Explicit rule tables.
//!
//! Every keyword- or term-driven classification lives here as a constant
//! table plus one small function that applies it:
//!
//! | Table | Maps | Used by |
//! |-------|------|---------|
//! | [`domain_keywords`] | requirement keyword → (domain, priority) | consultation targeting |
//! | [`triggers`] | answer term → additional domain | conditional consultation |
//! | [`antonyms`] | antonym pair → contradiction | conflict detection |
//! | [`approaches`] | sub-goal + strategy names → approach clash | conflict detection |
//! | [`influence`] | domain → influencers, pair → collaboration strength | scheduling |

pub mod antonyms;
pub mod approaches;
pub mod domain_keywords;
pub mod influence;
pub mod triggers;

pub use antonyms::{ANTONYM_PAIRS, find_contradiction};
pub use approaches::{APPROACH_RULES, ApproachClash, find_approach_clash};
pub use domain_keywords::{DOMAIN_KEYWORD_RULES, KeywordRule, derive_targets};
pub use influence::{COLLABORATION_THRESHOLD, collaboration_strength, influencers};
pub use triggers::{TRIGGER_RULES, TriggerRule, triggered_domains};
