use crate::models::{KeywordWeights, ServiceRecord};
use crate::core::scoring::{score_service, tokenize};

/// Keyword matcher over the service catalog
///
/// A pure function of the query and the catalog order: the same inputs
/// always select the same service.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    weights: KeywordWeights,
}

impl KeywordMatcher {
    pub fn new(weights: KeywordWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: KeywordWeights::default(),
        }
    }

    pub fn weights(&self) -> &KeywordWeights {
        &self.weights
    }

    /// Return the single best-scoring service, or `None` if nothing scores above zero
    ///
    /// Ties keep the service that appears first in the catalog.
    pub fn best_match<'a>(&self, query: &str, catalog: &'a [ServiceRecord]) -> Option<&'a ServiceRecord> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<(&ServiceRecord, f64)> = None;
        for service in catalog {
            let score = score_service(&tokens, service, &self.weights);
            let is_better = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if is_better {
                best = Some((service, score));
            }
        }

        best.filter(|(_, score)| *score > 0.0).map(|(service, _)| service)
    }

    /// Score every service with a positive score, highest first
    ///
    /// The sort is stable so equal scores keep catalog order.
    pub fn rank<'a>(&self, query: &str, catalog: &'a [ServiceRecord]) -> Vec<(f64, &'a ServiceRecord)> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return vec![];
        }

        let mut ranked: Vec<(f64, &ServiceRecord)> = catalog
            .iter()
            .map(|service| (score_service(&tokens, service, &self.weights), service))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
