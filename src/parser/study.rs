use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum summary length (chars, after cleaning) for a study to be worth
/// showing. Shorter snippets are dropped, never surfaced as errors.
pub const MIN_SUMMARY_CHARS: usize = 20;

static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static WS_BEFORE_NEWLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\n").unwrap());
static HSPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// One extracted result: title, link target, cleaned summary snippet.
/// Identity for deduplication is the trimmed url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub title: String,
    pub url: String,
    pub summary: String,
}

impl Study {
    /// Whitespace normalization: title collapsed to single spaces, url
    /// trimmed, summary keeps its line structure but loses trailing
    /// whitespace and horizontal runs.
    pub fn clean(self) -> Study {
        let summary = WS_BEFORE_NEWLINE_RE.replace_all(&self.summary, "\n");
        let summary = HSPACE_RUN_RE.replace_all(&summary, " ");
        Study {
            title: WS_RUN_RE.replace_all(&self.title, " ").trim().to_string(),
            url: self.url.trim().to_string(),
            summary: summary.trim().to_string(),
        }
    }

    /// Non-empty fields after cleaning.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty() && !self.summary.is_empty()
    }

    pub fn has_usable_summary(&self) -> bool {
        self.summary.chars().count() >= MIN_SUMMARY_CHARS
    }

    pub fn dedup_key(&self) -> &str {
        self.url.trim()
    }
}

// ── Tests ──
