use serde::{Deserialize, Serialize};

/// A citizen service offered by the Gram Panchayat
///
/// Records are owned by the administrative tooling that populates the
/// catalog; the recommender only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename(serialize = "id", deserialize = "$id"), alias = "id", default)]
    pub id: String,
    pub service_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub processing_time: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub documents_required: Vec<String>,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub application_link: String,
    #[serde(default)]
    pub keywords: String,
}

impl ServiceRecord {
    /// Lower-cased name, description, category and keywords joined by spaces
    pub fn composite_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.service_name, self.description, self.category, self.keywords
        )
        .to_lowercase()
    }

    /// Fields exposed to citizens in a recommendation
    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            service_name: self.service_name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            processing_time: self.processing_time.clone(),
            fee: self.fee.clone(),
            documents_required: self.documents_required.clone(),
            eligibility: self.eligibility.clone(),
            application_link: self.application_link.clone(),
        }
    }
}

/// Public projection of a [`ServiceRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_name: String,
    pub description: String,
    pub category: String,
    pub processing_time: String,
    pub fee: String,
    pub documents_required: Vec<String>,
    pub eligibility: String,
    pub application_link: String,
}

/// Which path produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    KeywordMatch,
    AiMatch,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::KeywordMatch => "keyword_match",
            MatchMethod::AiMatch => "ai_match",
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record appended to the `chatbot_queries` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub service_matched: String,
    pub method: MatchMethod,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl QueryLogEntry {
    /// Build an entry stamped with the current server time
    pub fn new(query: &str, service_matched: &str, method: MatchMethod) -> Self {
        Self {
            query: query.to_string(),
            service_matched: service_matched.to_string(),
            method,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Keyword scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordWeights {
    /// Token found anywhere in the composite text
    pub composite: f64,
    /// Additional bonus when the token is in the service name
    pub name: f64,
    /// Additional bonus when the token is in the category
    pub category: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            composite: 1.0,
            name: 2.0,
            category: 1.5,
        }
    }
}
