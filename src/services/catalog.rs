use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use crate::models::{QueryLogEntry, ServiceRecord};
use crate::services::appwrite::AppwriteError;

/// Errors surfaced by a catalog store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Appwrite(#[from] AppwriteError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to load catalog seed: {0}")]
    Seed(String),
}

/// Document store holding the service catalog and the query audit log
///
/// Implementations never cache: every call reflects the store as it is now.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every service record, in store order
    async fn list_services(&self) -> Result<Vec<ServiceRecord>, StoreError>;

    /// A single service by id
    async fn get_service(&self, id: &str) -> Result<Option<ServiceRecord>, StoreError> {
        let services = self.list_services().await?;
        Ok(services.into_iter().find(|s| s.id == id))
    }

    /// Append an entry to the query log
    async fn record_query(&self, entry: &QueryLogEntry) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1000;

/// Catalog held in process memory
///
/// Used for local runs seeded from a JSON file and as the store in tests.
/// The most recent query log entries are kept for inspection; once the log
/// is full the oldest entry is dropped on each append.
pub struct InMemoryCatalog {
    services: Vec<ServiceRecord>,
    queries: Mutex<VecDeque<QueryLogEntry>>,
    query_log_capacity: usize,
    reject_writes: bool,
}

impl InMemoryCatalog {
    pub fn new(services: Vec<ServiceRecord>) -> Self {
        Self {
            services,
            queries: Mutex::new(VecDeque::new()),
            query_log_capacity: DEFAULT_QUERY_LOG_CAPACITY,
            reject_writes: false,
        }
    }

    /// Keep at most `capacity` query log entries
    pub fn with_query_log_capacity(mut self, capacity: usize) -> Self {
        self.query_log_capacity = capacity;
        self
    }

    /// Load a JSON array of service records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        let services: Vec<ServiceRecord> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} services from {}", services.len(), path.display());

        Ok(Self::new(services))
    }

    /// Make every `record_query` call fail
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Entries appended so far
    pub fn logged_queries(&self) -> Vec<QueryLogEntry> {
        match self.queries.lock() {
            Ok(queries) => queries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_services(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        Ok(self.services.clone())
    }

    async fn record_query(&self, entry: &QueryLogEntry) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable("query log is read-only".to_string()));
        }

        if self.query_log_capacity == 0 {
            return Ok(());
        }

        let mut queries = self
            .queries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        while queries.len() >= self.query_log_capacity {
            queries.pop_front();
        }
        queries.push_back(entry.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
