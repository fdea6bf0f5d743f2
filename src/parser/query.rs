use std::sync::LazyLock;

use regex::Regex;

// Alert emails carry a footer like "This message was sent by Google Scholar
// because you're following new results for <query>." The capture stops at a
// sentence end or at the first trailing footer action.
static ALERT_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)following new results for\s+(.+?)(?:\.\s|\.?$|Cancel alert|You can manage|Manage alerts)")
        .unwrap()
});

/// Recover the alert's subject phrase from whitespace-collapsed document
/// text. Returns an empty string when the boilerplate sentence is absent.
pub fn infer_alert_query(document_text: &str) -> String {
    ALERT_QUERY_RE
        .captures(document_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_sentence() {
        let text = "This message was sent by Google Scholar because you're \
                    following new results for Jane Doe. Cancel alert Manage alerts";
        assert_eq!(infer_alert_query(text), "Jane Doe");
    }

    #[test]
    fn stops_at_cancel_alert_without_period() {
        let text = "you're following new results for dark triad Cancel alert";
        assert_eq!(infer_alert_query(text), "dark triad");
    }

    #[test]
    fn stops_at_manage_phrase() {
        let text = "following new results for HEXACO personality You can manage your alerts";
        assert_eq!(infer_alert_query(text), "HEXACO personality");
    }

    #[test]
    fn end_of_text_with_optional_period() {
        assert_eq!(infer_alert_query("following new results for Noam Sobel."), "Noam Sobel");
        assert_eq!(infer_alert_query("following new results for Noam Sobel"), "Noam Sobel");
    }

    #[test]
    fn case_insensitive_match() {
        let text = "Following New Results For mbti research. ";
        assert_eq!(infer_alert_query(text), "mbti research");
    }

    #[test]
    fn absent_boilerplate_yields_empty() {
        assert_eq!(infer_alert_query(""), "");
        assert_eq!(infer_alert_query("an unrelated email body"), "");
    }
}
