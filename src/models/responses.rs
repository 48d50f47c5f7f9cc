use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchMethod, ServiceRecord, ServiceSummary};

/// Where the front end lists every available service
pub const SERVICES_FALLBACK_URL: &str = "/services";

/// Successful recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub query: String,
    pub recommendation: ServiceSummary,
}

/// No service matched with enough confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertainResponse {
    pub success: bool,
    pub message: String,
    pub fallback_url: String,
    pub query: String,
}

impl UncertainResponse {
    pub fn for_query(query: &str) -> Self {
        Self {
            success: false,
            message: "I couldn't find a specific service matching your query. Please browse all available services.".to_string(),
            fallback_url: SERVICES_FALLBACK_URL.to_string(),
            query: query.to_string(),
        }
    }
}

/// Catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub success: bool,
    pub count: usize,
    pub services: Vec<ServiceRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Snapshot of recent recommendation activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMetricsResponse {
    pub total_queries: u64,
    pub keyword_matches: u64,
    pub ai_matches: u64,
    pub uncertain: u64,
    pub failures: u64,
    pub recent: Vec<QueryOutcome>,
}

/// One served query, as kept in the recent-activity buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub query: String,
    pub service_matched: Option<String>,
    pub method: Option<MatchMethod>,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            status_code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncertain_response_points_to_listing() {
        let response = UncertainResponse::for_query("xyzzy");
        assert!(!response.success);
        assert_eq!(response.fallback_url, "/services");
        assert_eq!(response.query, "xyzzy");
    }

    #[test]
    fn test_error_response_omits_missing_details() {
        let json = serde_json::to_value(ErrorResponse::new("Bad request", "Query must not be empty", 400)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(
            ErrorResponse::new("Internal server error", "boom", 500).with_details("store unreachable"),
        )
        .unwrap();
        assert_eq!(json["details"], "store unreachable");
    }
}
