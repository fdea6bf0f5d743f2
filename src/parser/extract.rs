use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use tracing::debug;

use super::markup;
use super::study::Study;

// Footer/action/social links are never results, whatever row they sit in.
const LINK_TEXT_DENYLIST: &[&str] = &[
    "cancel alert",
    "google scholar",
    "twitter",
    "facebook",
    "manage alerts",
    "unsubscribe",
    "accounts.google.com",
];

// Boilerplate sentences stripped from container text before line filtering.
// Longer phrases come before their substrings so each removal sees the
// fullest match first.
const BOILERPLATE_PHRASES: &[&str] = &[
    "Cancel alert",
    "This message was sent by Google Scholar because you're following new results for",
    "This message was sent by Google Scholar",
    "You're following new results for",
    "Manage alerts",
];

static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

static BOILERPLATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_PHRASES
        .iter()
        .map(|p| {
            RegexBuilder::new(&regex::escape(p))
                .case_insensitive(true)
                .build()
                .unwrap()
        })
        .collect()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());
// Prose remainder of a citation line: whatever follows the year's trailing
// dash separator ("A Author, B Author - Venue, 2024 - snippet…").
static CITATION_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\b(?:19|20)\d{2}\b\s*-\s*(.*)$").unwrap());
static NAME_LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z .,'-]+$").unwrap());

/// Pull result studies out of one email's node tree. Links that fail the
/// scheme/denylist filter, or whose snippet cleans down to fewer than 20
/// chars, are dropped without error. Results are deduplicated by trimmed
/// url, first occurrence kept.
pub fn extract_studies(doc: &Html) -> Vec<Study> {
    let mut studies = Vec::new();

    for link in doc.select(&LINK_SEL) {
        let href = link.value().attr("href").unwrap_or("").trim();
        let title = markup::rendered_text(link).trim().to_string();
        if href.is_empty() || title.is_empty() {
            continue;
        }
        if !href.starts_with("http") {
            continue;
        }
        let title_lower = title.to_lowercase();
        if LINK_TEXT_DENYLIST.iter().any(|b| title_lower.contains(b)) {
            continue;
        }

        let summary = match markup::result_container(link) {
            Some(container) => clean_snippet(&markup::rendered_text(container), &title),
            None => String::new(),
        };

        let study = Study {
            title,
            url: href.to_string(),
            summary,
        }
        .clean();

        if !study.is_valid() || !study.has_usable_summary() {
            debug!(url = %study.url, "dropping candidate with unusable snippet");
            continue;
        }
        studies.push(study);
    }

    let mut seen = HashSet::new();
    studies.retain(|s| seen.insert(s.dedup_key().to_string()));
    studies
}

/// Reduce a result container's rendered text to a summary snippet. The
/// cleaning order is load-bearing: title removal, then boilerplate phrase
/// removal, then per-line citation/name filtering.
pub fn clean_snippet(container_text: &str, title: &str) -> String {
    let mut text = container_text.trim().to_string();
    if text.is_empty() {
        return String::new();
    }

    if !title.is_empty() {
        text = text.replace(title, " ");
    }
    for re in BOILERPLATE_RES.iter() {
        text = re.replace_all(&text, " ").into_owned();
    }

    let mut kept: Vec<String> = Vec::new();
    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if is_citation_header(line) {
            // The citation sometimes runs straight into the snippet on one
            // line; keep the prose tail when there is one.
            if let Some(tail) = salvage_citation_tail(line) {
                kept.push(tail);
            }
            continue;
        }
        if is_author_name_list(line) {
            continue;
        }
        kept.push(line.to_string());
    }

    kept.join("\n").trim().to_string()
}

// "K Lee, MC Ashton - Journal of Personality, 2024"
fn is_citation_header(line: &str) -> bool {
    line.contains(" - ") && YEAR_RE.is_match(line) && line.chars().count() < 200
}

fn salvage_citation_tail(line: &str) -> Option<String> {
    let tail = CITATION_TAIL_RE.captures(line)?.get(1)?.as_str().trim();
    // Venue suffixes like "nature.com" are not prose; require a few words.
    if tail.split_whitespace().count() >= 3 {
        Some(tail.to_string())
    } else {
        None
    }
}

// "John Smith, Alice Doe" — letters/commas only and no sentence punctuation.
fn is_author_name_list(line: &str) -> bool {
    NAME_LIST_RE.is_match(line)
        && line.split(',').count() >= 2
        && !line.contains(['.', '!', '?'])
}

// ── Tests ──
