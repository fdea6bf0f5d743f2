use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Ancestor hops tried when resolving a result link's enclosing block.
/// Tuned against the alert-email template; changing it changes which
/// snippet text each link picks up.
const CONTAINER_HOPS: usize = 8;

static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parse raw markup into a node tree. html5ever never fails: malformed or
/// empty input yields a best-effort (possibly empty) tree.
pub fn parse(raw: &str) -> Html {
    Html::parse_document(raw)
}

/// Visible-text approximation for one element: descendant text nodes in
/// document order, with line breaks around block-level elements and at
/// `<br>`. Script/style content is skipped.
pub fn rendered_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    append_rendered(el, &mut out);
    out
}

/// Whole-document text with whitespace runs collapsed to single spaces.
pub fn document_text(doc: &Html) -> String {
    let text = rendered_text(doc.root_element());
    WS_RUN_RE.replace_all(&text, " ").trim().to_string()
}

/// Walk from the link through its ancestors, at most CONTAINER_HOPS nodes,
/// looking for the table row/cell/table the result renders in. Falls back
/// to the immediate parent element when the template is not table-shaped.
pub fn result_container(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut current = Some(link);
    for _ in 0..CONTAINER_HOPS {
        let Some(el) = current else { break };
        if matches!(el.value().name(), "tr" | "td" | "table") {
            return Some(el);
        }
        current = el.parent().and_then(ElementRef::wrap);
    }
    link.parent().and_then(ElementRef::wrap)
}

fn append_rendered(el: ElementRef<'_>, out: &mut String) {
    let tag = el.value().name();
    match tag {
        "br" => {
            out.push('\n');
            return;
        }
        "script" | "style" | "head" | "title" => return,
        _ => {}
    }

    let block = is_block(tag);
    if block {
        out.push('\n');
    }
    for child in el.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    append_rendered(child_el, out);
                }
            }
            _ => {}
        }
    }
    if block {
        out.push('\n');
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "body"
            | "div"
            | "p"
            | "table"
            | "tbody"
            | "tr"
            | "td"
            | "th"
            | "ul"
            | "ol"
            | "li"
            | "blockquote"
            | "pre"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
    )
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn first_link(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("a").unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn block_elements_break_lines() {
        let doc = parse("<div>one</div><div>two<br>three</div>");
        let lines: Vec<String> = rendered_text(doc.root_element())
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        assert_eq!(lines, ["one", "two", "three"]);
    }

    #[test]
    fn inline_elements_do_not_break() {
        let doc = parse("<div>results for <b>Jane Doe</b>.</div>");
        let text = document_text(&doc);
        assert_eq!(text, "results for Jane Doe.");
    }

    #[test]
    fn empty_and_malformed_input() {
        assert_eq!(document_text(&parse("")), "");
        // Unclosed tags still yield a best-effort tree.
        let doc = parse("<table><tr><td>cell");
        assert_eq!(document_text(&doc), "cell");
    }

    #[test]
    fn container_is_nearest_table_cell() {
        let doc = parse("<table><tr><td><h3><a href='http://x'>t</a></h3><div>snippet</div></td></tr></table>");
        let container = result_container(first_link(&doc)).unwrap();
        assert_eq!(container.value().name(), "td");
    }

    #[test]
    fn container_falls_back_to_parent_outside_tables() {
        let doc = parse("<div id='wrap'><a href='http://x'>t</a></div>");
        let container = result_container(first_link(&doc)).unwrap();
        assert_eq!(container.value().name(), "div");
    }

    #[test]
    fn container_walk_is_bounded() {
        // The td sits nine ancestors up, past the hop bound, so resolution
        // falls back to the immediate parent.
        let mut html = String::from("<table><tr><td>");
        for _ in 0..9 {
            html.push_str("<span>");
        }
        html.push_str("<a href='http://x'>t</a>");
        let doc = parse(&html);
        let container = result_container(first_link(&doc)).unwrap();
        assert_eq!(container.value().name(), "span");
    }

    #[test]
    fn script_content_is_invisible() {
        let doc = parse("<div>shown</div><script>var hidden = 1;</script>");
        assert_eq!(document_text(&doc), "shown");
    }
}
