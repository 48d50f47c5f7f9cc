use serde_json::json;
use crate::models::ServiceRecord;

/// Build the completion prompt for a citizen query
///
/// Only name, description and category of each service are embedded.
pub fn build_prompt(query: &str, catalog: &[ServiceRecord]) -> String {
    let condensed: Vec<serde_json::Value> = catalog
        .iter()
        .map(|s| {
            json!({
                "name": s.service_name,
                "description": s.description,
                "category": s.category,
            })
        })
        .collect();

    format!(
        "You are an assistant for a Gram Panchayat citizen services portal. \
         From the services listed below, pick the one that best matches the citizen's request \
         and reply with only its exact service name.\n\n\
         Services:\n{}\n\n\
         Citizen request: \"{}\"\n\n\
         Service name:",
        serde_json::Value::Array(condensed),
        query.trim()
    )
}

const ANSWER_PREFIX: &str = "service name:";

/// Reduce raw generated text to a lower-cased service name fragment
///
/// Takes the first non-empty line and strips an echoed `Service name:`
/// prefix (any case), surrounding quotes, markdown emphasis and punctuation.
pub fn clean_suggestion(generated: &str) -> Option<String> {
    let line = generated.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = match line.get(..ANSWER_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(ANSWER_PREFIX) => &line[ANSWER_PREFIX.len()..],
        _ => line,
    };
    let line = line.trim_matches(|c: char| {
        matches!(c, '"' | '\'' | '*' | '`' | '.' | ',' | ';' | ':' | '!') || c.is_whitespace()
    });

    if line.is_empty() {
        None
    } else {
        Some(line.to_lowercase())
    }
}

fn find_by_name<'a>(suggestion: &str, catalog: &'a [ServiceRecord]) -> Option<&'a ServiceRecord> {
    catalog.iter().find(|service| {
        let name = service.service_name.trim().to_lowercase();
        !name.is_empty() && (suggestion.contains(&name) || name.contains(suggestion))
    })
}

/// Map a generated suggestion back onto the catalog
///
/// The first service whose name contains the suggestion, or is contained
/// in it, wins. The cleaned first line is tried first, then the whole
/// reply, so a preamble line does not hide the answer. Services with an
/// empty name never match.
pub fn resolve_suggestion<'a>(generated: &str, catalog: &'a [ServiceRecord]) -> Option<&'a ServiceRecord> {
    let suggestion = clean_suggestion(generated)?;

    find_by_name(&suggestion, catalog).or_else(|| {
        let whole = generated.trim().to_lowercase();
        find_by_name(&whole, catalog)
    })
}
