// Core algorithm exports
pub mod matcher;
pub mod recommender;
pub mod retry;
pub mod scoring;
pub mod suggestion;

pub use matcher::KeywordMatcher;
pub use recommender::{Recommender, Recommendation, RecommendError};
pub use retry::{generate_with_retry, FixedDelay, RetryPolicy};
pub use scoring::{score_service, tokenize};
pub use suggestion::{build_prompt, clean_suggestion, resolve_suggestion};
