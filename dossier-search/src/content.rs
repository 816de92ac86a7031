//! HTML content extraction: strips boilerplate and returns readable text.
//!
//! Parses raw HTML, skips non-content elements (scripts, styles, navigation,
//! forms), picks the most specific content container, and cleans the text
//! into newline-separated lines suitable for an LLM prompt.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{Result, SearchError};
use crate::types::ExtractedPage;

/// Elements removed together with everything inside them.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "form", "noscript", "svg", "iframe",
    "template",
];

/// Elements that start a new line in the extracted text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// Content containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    r#"div[class*="content"], div[class*="main"], div[class*="article"], div[class*="post"], div[class*="body"]"#,
    "body",
];

/// Thresholds applied when cleaning extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningRules {
    /// Lines with fewer words are dropped.
    pub min_words_per_line: usize,
    /// Maximum characters kept.
    pub max_chars: usize,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            min_words_per_line: 6,
            max_chars: 15_000,
        }
    }
}

/// Extract the title and cleaned main text from raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if nothing survives cleaning.
pub fn extract_page(html: &str, url: &str, rules: CleaningRules) -> Result<ExtractedPage> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let raw = extract_main_text(&document);
    let text = clean_text(&raw, rules);

    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }
    Ok(ExtractedPage::new(url, title, text))
}

/// Extract the page title from the `<title>` element.
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract text from the most specific content container.
///
/// Containers nested inside boilerplate (a `<main>` inside a `<header>`)
/// are ignored. Falls back to the whole document when no container has
/// text.
fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let candidate = document
            .select(&selector)
            .find(|el| !inside_boilerplate(*el));
        if let Some(element) = candidate {
            let mut text = String::new();
            collect_text(element, &mut text);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    let mut text = String::new();
    collect_text(document.root_element(), &mut text);
    text
}

fn is_boilerplate(name: &str) -> bool {
    BOILERPLATE_TAGS.contains(&name)
}

fn inside_boilerplate(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| match node.value() {
        Node::Element(el) => is_boilerplate(el.name()),
        _ => false,
    })
}

/// Walk `element`, appending text with newlines at block boundaries.
///
/// Whitespace inside text nodes (source indentation, hard wraps) becomes a
/// single space; only block structure produces line breaks.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let mut words = text.split_whitespace().peekable();
                if words.peek().is_none() {
                    if !text.is_empty() && !out.ends_with([' ', '\n']) {
                        out.push(' ');
                    }
                    continue;
                }
                if text.starts_with(char::is_whitespace) && !out.ends_with([' ', '\n']) {
                    out.push(' ');
                }
                out.push_str(&words.collect::<Vec<_>>().join(" "));
                if text.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if is_boilerplate(name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Clean extracted text.
///
/// 1. Collapse runs of horizontal whitespace to one space and trim lines.
/// 2. Collapse runs of blank lines to a single blank line.
/// 3. Drop lines with fewer than `min_words_per_line` words.
/// 4. Join the remaining lines with `\n`.
/// 5. Truncate to `max_chars` characters.
pub fn clean_text(raw: &str, rules: CleaningRules) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            previous_blank = false;
            lines.push(collapsed);
        }
    }

    let kept: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| line.split_whitespace().count() >= rules.min_words_per_line)
        .collect();

    truncate_chars(kept.join("\n").trim(), rules.max_chars)
}

/// Truncate text to at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_LINE: &str = "Retail sales grew four percent across the region this quarter.";

    fn page(html: &str) -> Result<ExtractedPage> {
        extract_page(html, "https://example.com/a", CleaningRules::default())
    }

    #[test]
    fn title_is_extracted() {
        let html = format!(
            "<html><head><title> Quarterly\n  Report </title></head><body><p>{LONG_LINE}</p></body></html>"
        );
        let page = page(&html).expect("parse");
        assert_eq!(page.title, "Quarterly Report");
        assert_eq!(page.url, "https://example.com/a");
    }

    #[test]
    fn boilerplate_elements_removed() {
        let html = format!(
            r#"<html><body>
            <header><p>Site header with plenty of words in it here</p></header>
            <nav><p>Home About Contact Blog Careers Press Investors</p></nav>
            <p>{LONG_LINE}</p>
            <script>var tracker = "one two three four five six seven";</script>
            <style>.a {{ color: red; margin: 0 auto; padding: 1px 2px; }}</style>
            <form><p>Subscribe to our newsletter for weekly market updates</p></form>
            <aside><p>Related articles you might also enjoy reading today</p></aside>
            <footer><p>Copyright notice and legal terms apply to everything</p></footer>
            </body></html>"#
        );
        let page = page(&html).expect("parse");
        assert_eq!(page.text, LONG_LINE);
    }

    #[test]
    fn main_preferred_over_body() {
        let html = format!(
            "<html><body><p>Outer paragraph that has more than six words total</p>\
             <main><p>{LONG_LINE}</p></main></body></html>"
        );
        let page = page(&html).expect("parse");
        assert_eq!(page.text, LONG_LINE);
    }

    #[test]
    fn article_used_when_no_main() {
        let html = format!(
            "<html><body><div><p>Teaser paragraph that has more than six words total</p></div>\
             <article><p>{LONG_LINE}</p></article></body></html>"
        );
        assert_eq!(page(&html).expect("parse").text, LONG_LINE);
    }

    #[test]
    fn content_class_div_used_when_no_semantic_container() {
        let html = format!(
            r#"<html><body><div class="sidebar"><p>Sidebar paragraph that has more than six words</p></div>
            <div class="post-content"><p>{LONG_LINE}</p></div></body></html>"#
        );
        assert_eq!(page(&html).expect("parse").text, LONG_LINE);
    }

    #[test]
    fn main_inside_header_is_ignored() {
        let html = format!(
            "<html><body><header><main><p>Header main with more than six words</p></main></header>\
             <article><p>{LONG_LINE}</p></article></body></html>"
        );
        assert_eq!(page(&html).expect("parse").text, LONG_LINE);
    }

    #[test]
    fn inline_elements_stay_on_one_line() {
        let html = "<html><body><p>The <b>bold</b> claim is that <a href='#'>prices</a> rose again this year.</p></body></html>";
        let page = page(html).expect("parse");
        assert_eq!(
            page.text,
            "The bold claim is that prices rose again this year."
        );
    }

    #[test]
    fn short_lines_dropped() {
        let html = format!(
            "<html><body><ul><li>Home</li><li>Pricing</li></ul><p>{LONG_LINE}</p><p>Read more</p></body></html>"
        );
        assert_eq!(page(&html).expect("parse").text, LONG_LINE);
    }

    #[test]
    fn only_boilerplate_is_parse_error() {
        let html = "<html><head><style>body{color:red}</style></head>\
                    <body><script>console.log('hello world from the script tag');</script></body></html>";
        let err = page(html).unwrap_err();
        assert!(err.to_string().contains("no extractable content"));
    }

    #[test]
    fn empty_html_is_parse_error() {
        assert!(page("").is_err());
    }

    #[test]
    fn clean_text_collapses_whitespace_and_filters() {
        let raw = concat!(
            "one two   three\tfour five six\n\n\n\n",
            "short line\n  seven eight nine ten eleven twelve  ",
        );
        let cleaned = clean_text(raw, CleaningRules::default());
        assert_eq!(
            cleaned,
            "one two three four five six\nseven eight nine ten eleven twelve"
        );
    }

    #[test]
    fn clean_text_keeps_single_blank_line_when_not_filtering() {
        let rules = CleaningRules {
            min_words_per_line: 0,
            max_chars: 1000,
        };
        assert_eq!(clean_text("a\n\n\n\nb", rules), "a\n\nb");
    }

    #[test]
    fn clean_text_truncates_on_char_boundary() {
        let rules = CleaningRules {
            min_words_per_line: 1,
            max_chars: 5,
        };
        assert_eq!(clean_text("éééééééé", rules), "ééééé");
    }

    #[test]
    fn long_page_truncated_to_budget() {
        let body = format!("<p>{LONG_LINE}</p>").repeat(1000);
        let html = format!("<html><body>{body}</body></html>");
        let page = page(&html).expect("parse");
        assert_eq!(page.length, 15_000);
        assert_eq!(page.text.chars().count(), 15_000);
    }
}
