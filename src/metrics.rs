use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use crate::models::{MatchMethod, QueryMetricsResponse, QueryOutcome};

/// Counters and a bounded window of recent recommendation outcomes
///
/// The window is a ring buffer: once full, each push evicts the oldest entry.
#[derive(Debug)]
pub struct QueryMetrics {
    total: AtomicU64,
    keyword_matches: AtomicU64,
    ai_matches: AtomicU64,
    uncertain: AtomicU64,
    failures: AtomicU64,
    recent: Mutex<VecDeque<QueryOutcome>>,
    capacity: usize,
}

impl QueryMetrics {
    pub fn new(capacity: usize) -> Self {
        Self {
            total: AtomicU64::new(0),
            keyword_matches: AtomicU64::new(0),
            ai_matches: AtomicU64::new(0),
            uncertain: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a served query; `matched` is `None` for an uncertain answer
    pub fn record_outcome(&self, query: &str, matched: Option<(&str, MatchMethod)>) {
        self.total.fetch_add(1, Ordering::Relaxed);
        match matched {
            Some((_, MatchMethod::KeywordMatch)) => self.keyword_matches.fetch_add(1, Ordering::Relaxed),
            Some((_, MatchMethod::AiMatch)) => self.ai_matches.fetch_add(1, Ordering::Relaxed),
            None => self.uncertain.fetch_add(1, Ordering::Relaxed),
        };

        self.push(QueryOutcome {
            query: query.to_string(),
            service_matched: matched.map(|(name, _)| name.to_string()),
            method: matched.map(|(_, method)| method),
            at: chrono::Utc::now(),
        });
    }

    /// Record a request that ended in an error
    pub fn record_failure(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn push(&self, outcome: QueryOutcome) {
        if self.capacity == 0 {
            return;
        }

        let mut recent = match self.recent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while recent.len() >= self.capacity {
            recent.pop_front();
        }
        recent.push_back(outcome);
    }

    pub fn snapshot(&self) -> QueryMetricsResponse {
        let recent = match self.recent.lock() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        };

        QueryMetricsResponse {
            total_queries: self.total.load(Ordering::Relaxed),
            keyword_matches: self.keyword_matches.load(Ordering::Relaxed),
            ai_matches: self.ai_matches.load(Ordering::Relaxed),
            uncertain: self.uncertain.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            recent,
        }
    }
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new(100)
    }
}
