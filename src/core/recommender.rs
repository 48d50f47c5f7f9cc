use std::sync::Arc;
use thiserror::Error;
use crate::core::{
    matcher::KeywordMatcher,
    retry::{generate_with_retry, RetryPolicy},
    suggestion::{build_prompt, resolve_suggestion},
};
use crate::models::{MatchMethod, QueryLogEntry, ServiceRecord};
use crate::services::{CatalogStore, CompletionProvider, StoreError};

/// Errors that end a recommendation request
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("No services available in the catalog")]
    CatalogEmpty,

    #[error("Catalog store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Matched {
        service: ServiceRecord,
        method: MatchMethod,
    },
    Uncertain,
}

impl Recommendation {
    pub fn service(&self) -> Option<&ServiceRecord> {
        match self {
            Recommendation::Matched { service, .. } => Some(service),
            Recommendation::Uncertain => None,
        }
    }

    pub fn method(&self) -> Option<MatchMethod> {
        match self {
            Recommendation::Matched { method, .. } => Some(*method),
            Recommendation::Uncertain => None,
        }
    }
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Reject blank queries
/// 2. Load the catalog (fresh on every call)
/// 3. Ask the completion provider for a service name, with retries
/// 4. Map the suggestion back onto the catalog
/// 5. Fall back to keyword scoring
/// 6. Log the match
///
/// Provider failures never fail the request; the keyword path always runs
/// when the AI path yields nothing.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<dyn CatalogStore>,
    completion: Arc<dyn CompletionProvider>,
    retry: Arc<dyn RetryPolicy>,
    matcher: KeywordMatcher,
}

impl Recommender {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        completion: Arc<dyn CompletionProvider>,
        retry: Arc<dyn RetryPolicy>,
        matcher: KeywordMatcher,
    ) -> Self {
        Self {
            catalog,
            completion,
            retry,
            matcher,
        }
    }

    /// Recommend at most one service for a citizen query
    pub async fn recommend(&self, query: &str) -> Result<Recommendation, RecommendError> {
        if query.trim().is_empty() {
            return Err(RecommendError::EmptyQuery);
        }

        let services = self.catalog.list_services().await?;
        if services.is_empty() {
            tracing::error!("Service catalog is empty");
            return Err(RecommendError::CatalogEmpty);
        }

        tracing::debug!("Matching query {:?} against {} services", query, services.len());

        let matched = match self.ai_match(query, &services).await {
            Some(service) => Some((service, MatchMethod::AiMatch)),
            None => self
                .matcher
                .best_match(query, &services)
                .map(|service| (service, MatchMethod::KeywordMatch)),
        };

        let Some((service, method)) = matched else {
            tracing::info!("No confident match for query {:?}", query);
            return Ok(Recommendation::Uncertain);
        };

        let entry = QueryLogEntry::new(query, &service.service_name, method);
        self.catalog.record_query(&entry).await?;

        tracing::info!("Recommended {:?} for query {:?} via {}", service.service_name, query, method);

        Ok(Recommendation::Matched {
            service: service.clone(),
            method,
        })
    }

    /// Try the completion provider; any failure is logged and yields `None`
    async fn ai_match<'a>(&self, query: &str, services: &'a [ServiceRecord]) -> Option<&'a ServiceRecord> {
        let prompt = build_prompt(query, services);

        let generated = match generate_with_retry(self.completion.as_ref(), self.retry.as_ref(), &prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("AI matching unavailable, falling back to keywords: {}", e);
                return None;
            }
        };

        let resolved = resolve_suggestion(&generated, services);
        if resolved.is_none() {
            tracing::debug!("AI suggestion {:?} matched no service", generated.trim());
        }
        resolved
    }
}
