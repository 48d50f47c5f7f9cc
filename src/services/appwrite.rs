use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::models::{QueryLogEntry, ServiceRecord};
use crate::services::catalog::{CatalogStore, StoreError};

/// Documents fetched per page when reading a whole collection
const PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Backs the service catalog:
/// - Reading every service record
/// - Fetching a single service
/// - Appending chatbot query log entries
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub services: String,
    pub chatbot_queries: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn check_status(status: StatusCode, action: &str) -> Result<(), AppwriteError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppwriteError::ApiError(format!("Failed to {}: {}", action, status)));
        }
        Ok(())
    }

    /// Fetch one page of the services collection, returning the documents and the reported total
    async fn fetch_services_page(&self, offset: usize) -> Result<(Vec<Value>, usize), AppwriteError> {
        let limit = urlencoding::encode(&format!("limit({})", PAGE_SIZE)).into_owned();
        let offset_query = urlencoding::encode(&format!("offset({})", offset)).into_owned();
        let url = format!(
            "{}?queries[]={}&queries[]={}",
            self.documents_url(&self.collections.services),
            limit,
            offset_query
        );

        tracing::debug!("Fetching services page at offset {}", offset);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        Self::check_status(response.status(), "list services")?;

        let json: Value = response.json().await?;

        let total = json
            .get("total")
            .and_then(|t| t.as_u64())
            .unwrap_or(0) as usize;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        Ok((documents, total))
    }

    /// Read the whole services collection, page by page
    pub async fn list_services(&self) -> Result<Vec<ServiceRecord>, AppwriteError> {
        let mut services = Vec::new();
        let mut offset = 0;

        loop {
            let (documents, total) = self.fetch_services_page(offset).await?;
            let page_len = documents.len();

            services.extend(documents.into_iter().filter_map(|doc| {
                match serde_json::from_value::<ServiceRecord>(doc) {
                    Ok(service) => Some(service),
                    Err(e) => {
                        tracing::warn!("Skipping malformed service document: {}", e);
                        None
                    }
                }
            }));

            offset += page_len;
            if page_len < PAGE_SIZE || offset >= total {
                break;
            }
        }

        tracing::debug!("Loaded {} services", services.len());

        Ok(services)
    }

    /// Get a single service by document ID
    pub async fn get_service(&self, id: &str) -> Result<Option<ServiceRecord>, AppwriteError> {
        let url = format!(
            "{}/{}",
            self.documents_url(&self.collections.services),
            urlencoding::encode(id)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(response.status(), "fetch service")?;

        let json: Value = response.json().await?;

        serde_json::from_value(json)
            .map(Some)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse service: {}", e)))
    }

    /// Append a query log entry
    pub async fn record_query(&self, entry: &QueryLogEntry) -> Result<(), AppwriteError> {
        let url = self.documents_url(&self.collections.chatbot_queries);

        let data = serde_json::to_value(entry)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode query log: {}", e)))?;
        let payload = serde_json::json!({
            "documentId": uuid::Uuid::new_v4().to_string(),
            "data": data,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        Self::check_status(response.status(), "record query")?;

        tracing::debug!("Recorded query log: {:?} -> {} ({})", entry.query, entry.service_matched, entry.method);

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for AppwriteClient {
    async fn list_services(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        Ok(AppwriteClient::list_services(self).await?)
    }

    async fn get_service(&self, id: &str) -> Result<Option<ServiceRecord>, StoreError> {
        Ok(AppwriteClient::get_service(self, id).await?)
    }

    async fn record_query(&self, entry: &QueryLogEntry) -> Result<(), StoreError> {
        Ok(AppwriteClient::record_query(self, entry).await?)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        match self.fetch_services_page(0).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Appwrite health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
