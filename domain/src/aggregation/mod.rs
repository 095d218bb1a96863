//! Confidence aggregation.

pub mod aggregator;
pub mod score;

pub use aggregator::ConfidenceAggregator;
pub use score::{
    AggregatedConfidence, AggregationContext, AggregationMethod, ConfidenceScore,
    ConsensusQuality,
};
