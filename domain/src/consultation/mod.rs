//! Consultation: requests, per-domain recommendations, and round results.

pub mod domain;
pub mod planning;
pub mod recommendation;
pub mod request;
pub mod result;

pub use domain::{DomainPriority, ExpertDomain};
pub use planning::{
    MAX_HIGHLIGHTS, MAX_HISTORY, collaborators, extract_highlights, priority_tiers,
    recent_history, sequential_order,
};
pub use recommendation::{DomainRecommendation, EffortLevel, HIGH_RISK_COUNT};
pub use request::{ConsultationPattern, ConsultationRequest, DomainQuery, QueryContext};
pub use result::{ConsultationResult, FailedConsultation};
