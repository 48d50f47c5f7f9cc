//! Gram Seva - service recommendation backend for the Gram Panchayat portal
//!
//! This library matches a citizen's free-text request to a single service in
//! the catalog. It asks an external completion model first and falls back to
//! deterministic keyword scoring whenever the model is unavailable or unsure.

pub mod config;
pub mod core;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{KeywordMatcher, Recommender, Recommendation, RecommendError, FixedDelay, RetryPolicy};
pub use crate::models::{ServiceRecord, ServiceSummary, MatchMethod, QueryLogEntry, KeywordWeights};
pub use crate::services::{CatalogStore, CompletionProvider, InMemoryCatalog};
