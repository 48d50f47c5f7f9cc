// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ServiceRecord, ServiceSummary, MatchMethod, QueryLogEntry, KeywordWeights};
pub use requests::RecommendRequest;
pub use responses::{
    RecommendResponse, UncertainResponse, ServiceListResponse, HealthResponse,
    QueryMetricsResponse, QueryOutcome, ErrorResponse, SERVICES_FALLBACK_URL,
};
