//! Conflict detection and resolution across domain recommendations.

pub mod conflict;
pub mod detector;
pub mod error;
pub mod resolver;
pub mod strategy;

pub use conflict::{ConflictKind, ConflictRecord, ImpactLevel};
pub use detector::{detect_conflicts, detect_pair};
pub use error::ResolutionError;
pub use resolver::{CONFIDENCE_SPREAD_THRESHOLD, ConflictResolver};
pub use strategy::{FALLBACK_CONFIDENCE, ResolutionPhase, ResolutionStrategy, ResolvedRecommendation};
