use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to recommend a service for a free-text citizen query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub query: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Query must not be empty".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_defaults_to_empty() {
        let req: RecommendRequest = serde_json::from_str("{}").unwrap();
        assert!(req.query.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_whitespace_query_is_rejected() {
        let req = RecommendRequest {
            query: "   \t ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_non_blank_query_is_accepted() {
        let req = RecommendRequest {
            query: "birth certificate".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
