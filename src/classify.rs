use std::sync::LazyLock;

use regex::Regex;

use crate::taxonomy::Taxonomy;

// Queries containing any of these are topic alerts, never person names.
const NOT_NAME_SIGNALS: &[&str] = &[
    "hexaco",
    "mbti",
    "myers",
    "big five",
    "dark triad",
    "machiavell",
    "sociosexual",
];

static NAME_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z'\-]*$").unwrap());

/// Route one email's batch to a section id. Total and deterministic; first
/// match wins in taxonomy order, person-name alerts short-circuit to the
/// fallback bucket, and anything unmatched lands there too.
pub fn classify<'t>(taxonomy: &'t Taxonomy, alert_query: &str, search_text: &str) -> &'t str {
    if looks_like_person_name(alert_query) {
        return taxonomy.fallback_id();
    }

    let query = alert_query.trim().to_lowercase();
    for section in taxonomy.topical() {
        if section.matchers.iter().any(|m| query.contains(m.as_str())) {
            return &section.id;
        }
    }

    let haystack = search_text.to_lowercase();
    for section in taxonomy.topical() {
        if section.matchers.iter().any(|m| haystack.contains(m.as_str())) {
            return &section.id;
        }
    }

    taxonomy.fallback_id()
}

/// 2–4 mostly-alphabetic tokens and no topic keyword, e.g. "Noam Sobel".
fn looks_like_person_name(alert_query: &str) -> bool {
    let query = alert_query.trim();
    if query.is_empty() {
        return false;
    }

    let lower = query.to_lowercase();
    if NOT_NAME_SIGNALS.iter().any(|s| lower.contains(s)) {
        return false;
    }

    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.len() < 2 || tokens.len() > 4 {
        return false;
    }

    let alphaish = tokens.iter().filter(|t| NAME_TOKEN_RE.is_match(t)).count();
    alphaish >= tokens.len().min(2)
}

// ── Tests ──
