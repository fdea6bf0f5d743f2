pub mod extract;
pub mod markup;
pub mod query;
pub mod study;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::email::EmailInput;
use study::Study;

/// One email reduced to its displayable content. `search_text` exists only
/// for classification and is discarded afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEmail {
    pub alert_query: String,
    pub studies: Vec<Study>,
    pub search_text: String,
    pub received_at: Option<DateTime<Utc>>,
}

/// Total over all inputs: empty or unparseable markup, missing fields and
/// malformed pre-structured entries all degrade to an empty or partial
/// study list, never an error.
pub fn normalize(email: &EmailInput) -> NormalizedEmail {
    let hint = email.alert_query.trim().to_string();

    // Pre-structured studies take precedence over markup parsing.
    if let Some(raw) = &email.studies {
        let studies: Vec<Study> = raw
            .iter()
            .map(|r| r.to_study().clean())
            .filter(|s| s.is_valid() && s.has_usable_summary())
            .collect();
        let body: Vec<String> = studies
            .iter()
            .map(|s| format!("{} {}", s.title, s.summary))
            .collect();
        let search_text = format!("{} {}", hint, body.join(" ")).trim().to_string();
        return NormalizedEmail {
            alert_query: hint,
            studies,
            search_text,
            received_at: email.received_at,
        };
    }

    let raw_html = email.raw_html.as_deref().unwrap_or("");
    if raw_html.trim().is_empty() {
        return NormalizedEmail {
            alert_query: hint,
            studies: Vec::new(),
            search_text: String::new(),
            received_at: email.received_at,
        };
    }

    let doc = markup::parse(raw_html);
    let body_text = markup::document_text(&doc);

    // The footer sentence, when present, beats the caller-supplied hint.
    let inferred = query::infer_alert_query(&body_text);
    let alert_query = if inferred.is_empty() { hint } else { inferred };

    let studies = extract::extract_studies(&doc);
    let search_text = format!("{} {}", alert_query, body_text).trim().to_string();

    NormalizedEmail {
        alert_query,
        studies,
        search_text,
        received_at: email.received_at,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{EmailInput, RawStudy};

    fn raw_study(title: &str, url: &str, summary: &str) -> RawStudy {
        RawStudy {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            summary: Some(summary.to_string()),
        }
    }

    #[test]
    fn total_over_empty_inputs() {
        let empty = normalize(&EmailInput::default());
        assert!(empty.studies.is_empty());
        assert!(empty.alert_query.is_empty());
        assert!(empty.search_text.is_empty());

        let blank_html = EmailInput {
            raw_html: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(normalize(&blank_html).studies.is_empty());

        let empty_studies = EmailInput {
            studies: Some(Vec::new()),
            ..Default::default()
        };
        assert!(normalize(&empty_studies).studies.is_empty());
    }

    #[test]
    fn prestructured_studies_take_precedence_over_markup() {
        let email = EmailInput {
            raw_html: Some("<a href='http://example.org/x'>From markup instead</a>".to_string()),
            studies: Some(vec![raw_study(
                "Given title",
                "http://example.org/given",
                "A summary long enough to be kept.",
            )]),
            ..Default::default()
        };
        let n = normalize(&email);
        assert_eq!(n.studies.len(), 1);
        assert_eq!(n.studies[0].url, "http://example.org/given");
    }

    #[test]
    fn malformed_prestructured_entries_are_dropped() {
        let email = EmailInput {
            alert_query: "big five".to_string(),
            studies: Some(vec![
                RawStudy::default(),
                raw_study("No url", "", "A summary long enough to be kept."),
                raw_study("Short summary", "http://example.org/s", "too short"),
                raw_study("Kept", "http://example.org/k", "A summary long enough to be kept."),
            ]),
            ..Default::default()
        };
        let n = normalize(&email);
        assert_eq!(n.studies.len(), 1);
        assert_eq!(n.studies[0].title, "Kept");
        // Validity invariant holds for everything that survives.
        assert!(n.studies.iter().all(|s| s.is_valid() && s.has_usable_summary()));
    }

    #[test]
    fn prestructured_search_text_covers_query_and_bodies() {
        let email = EmailInput {
            alert_query: "sociosexuality".to_string(),
            studies: Some(vec![raw_study(
                "Mating strategies revisited",
                "http://example.org/m",
                "Short-term mating orientation varied widely.",
            )]),
            ..Default::default()
        };
        let n = normalize(&email);
        assert!(n.search_text.contains("sociosexuality"));
        assert!(n.search_text.contains("Mating strategies revisited"));
        assert!(n.search_text.contains("Short-term mating orientation"));
    }

    #[test]
    fn inferred_query_supersedes_hint() {
        let email = EmailInput {
            alert_query: "the hint".to_string(),
            raw_html: Some(
                "<div>This message was sent by Google Scholar because you're \
                 following new results for Jane Doe. Cancel alert</div>"
                    .to_string(),
            ),
            ..Default::default()
        };
        assert_eq!(normalize(&email).alert_query, "Jane Doe");
    }

    #[test]
    fn hint_used_when_no_footer_sentence() {
        let email = EmailInput {
            alert_query: "the hint".to_string(),
            raw_html: Some("<div>no footer here</div>".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize(&email).alert_query, "the hint");
    }

    #[test]
    fn scholar_alert_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/scholar_alert.html").unwrap();
        let email = EmailInput {
            raw_html: Some(html),
            ..Default::default()
        };
        let n = normalize(&email);

        assert_eq!(n.alert_query, "hexaco personality");
        assert_eq!(n.studies.len(), 2);
        assert!(n.studies.iter().all(|s| s.is_valid() && s.has_usable_summary()));
        assert!(n.studies[0].title.contains("HEXACO"));
        assert!(!n.studies[0].summary.contains("Cancel alert"));
        assert!(
            !n.studies[0].summary.contains("2024"),
            "citation header leaked: {}",
            n.studies[0].summary
        );
        assert!(n.search_text.to_lowercase().contains("hexaco"));
    }
}
