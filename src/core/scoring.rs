use crate::models::{KeywordWeights, ServiceRecord};

/// Tokens shorter than this (in characters) carry no signal
pub const MIN_TOKEN_CHARS: usize = 3;

/// Split a query into lower-cased tokens, dropping anything of two characters or fewer
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Score a service against pre-tokenized query terms
///
/// Scoring formula, per token:
/// score += (
///     composite * [token in name+description+category+keywords] +
///     name      * [token in name] +
///     category  * [token in category]
/// )
///
/// Containment is plain substring containment, so "cert" scores against
/// "certificate". The name and category bonuses only apply to tokens that
/// already hit the composite text.
pub fn score_service(tokens: &[String], service: &ServiceRecord, weights: &KeywordWeights) -> f64 {
    let composite = service.composite_text();
    let name = service.service_name.to_lowercase();
    let category = service.category.to_lowercase();

    tokens
        .iter()
        .filter(|token| composite.contains(token.as_str()))
        .map(|token| {
            let mut points = weights.composite;
            if name.contains(token.as_str()) {
                points += weights.name;
            }
            if category.contains(token.as_str()) {
                points += weights.category;
            }
            points
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, description: &str, category: &str, keywords: &str) -> ServiceRecord {
        ServiceRecord {
            id: name.to_lowercase().replace(' ', "_"),
            service_name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            processing_time: String::new(),
            fee: String::new(),
            documents_required: vec![],
            eligibility: String::new(),
            application_link: String::new(),
            keywords: keywords.to_string(),
        }
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        assert_eq!(tokenize("I need a Birth Certificate"), vec!["need", "birth", "certificate"]);
        assert!(tokenize("a an to").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_counts_characters_not_bytes() {
        // Two Devanagari characters are six bytes but still too short
        assert!(tokenize("जल").is_empty());
        assert_eq!(tokenize("पानी"), vec!["पानी"]);
    }

    #[test]
    fn test_name_hit_scores_all_bonuses() {
        let svc = service("Birth Certificate", "Register a birth", "Certificates", "birth, newborn");
        let weights = KeywordWeights::default();

        // "birth": composite 1 + name 2; category "certificates" lacks it
        assert_eq!(score_service(&["birth".to_string()], &svc, &weights), 3.0);

        // "certificate": composite 1 + name 2 + category 1.5 (substring of "certificates")
        assert_eq!(score_service(&["certificate".to_string()], &svc, &weights), 4.5);
    }

    #[test]
    fn test_description_only_hit_scores_one() {
        let svc = service("Water Connection", "Apply for a new tap", "Utilities", "");
        let score = score_service(&["tap".to_string()], &svc, &KeywordWeights::default());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_unmatched_tokens_score_zero() {
        let svc = service("Trade License", "Shop permit", "Business", "license shop");
        let tokens = tokenize("xyzzy plugh quux");
        assert_eq!(score_service(&tokens, &svc, &KeywordWeights::default()), 0.0);
    }

    #[test]
    fn test_custom_weights_apply() {
        let svc = service("Trade License", "", "Business", "");
        let weights = KeywordWeights { composite: 0.5, name: 10.0, category: 0.0 };
        assert_eq!(score_service(&["trade".to_string()], &svc, &weights), 10.5);
    }
}
