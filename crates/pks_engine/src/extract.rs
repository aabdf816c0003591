use client_logging::client_warn;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};

/// Best-effort snapshot of a page's primary content plus lightweight
/// metadata. `author`/`description` are `None` when no selector matched;
/// they are never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub url: String,
    pub content: String,
    pub author: Option<String>,
    pub description: Option<String>,
}

/// One row of the candidate table: a CSS selector plus the minimum number of
/// visible characters its first match must exceed to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRule {
    pub selector: String,
    pub min_chars: usize,
}

impl CandidateRule {
    pub fn new(selector: impl Into<String>, min_chars: usize) -> Self {
        Self {
            selector: selector.into(),
            min_chars,
        }
    }
}

pub const DEFAULT_MIN_CONTENT_CHARS: usize = 100;

/// Extraction heuristics as data, so deployments can tune selectors and
/// thresholds without touching control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSettings {
    /// Ordered candidate table, most semantically specific first. `body` is
    /// tried last and additionally serves as the unconditional fallback.
    pub candidates: Vec<CandidateRule>,
    pub author_selectors: Vec<String>,
    pub description_selectors: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        let content_selectors = [
            "article",
            "main",
            "[role=\"main\"]",
            "#content",
            ".content",
            ".post-content",
            ".article-content",
            "body",
        ];
        Self {
            candidates: content_selectors
                .iter()
                .map(|selector| CandidateRule::new(*selector, DEFAULT_MIN_CONTENT_CHARS))
                .collect(),
            author_selectors: [
                "meta[name=\"author\"]",
                "meta[property=\"author\"]",
                "meta[name=\"dc.creator\"]",
                "[rel=\"author\"]",
                ".author",
                ".byline",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            description_selectors: [
                "meta[name=\"description\"]",
                "meta[property=\"og:description\"]",
                "meta[name=\"twitter:description\"]",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

pub trait Extractor: Send + Sync {
    fn extract(&self, doc: &Html, url: &str) -> ExtractedContent;
}

/// Structural content extractor: walks the candidate table and takes the
/// first element whose visible text clears its threshold, degrading to
/// `body` so extraction never fails outright.
#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    settings: ExtractSettings,
}

impl PageExtractor {
    pub fn new(settings: ExtractSettings) -> Self {
        Self { settings }
    }
}

impl Extractor for PageExtractor {
    fn extract(&self, doc: &Html, url: &str) -> ExtractedContent {
        ExtractedContent {
            title: document_title(doc),
            url: url.to_string(),
            content: select_content(doc, &self.settings.candidates),
            author: first_metadata_value(doc, &self.settings.author_selectors, true),
            description: first_metadata_value(doc, &self.settings.description_selectors, false),
        }
    }
}

fn select_content(doc: &Html, candidates: &[CandidateRule]) -> String {
    for rule in candidates {
        let Ok(selector) = Selector::parse(&rule.selector) else {
            client_warn!("skipping unparsable content selector {:?}", rule.selector);
            continue;
        };
        if let Some(element) = doc.select(&selector).next() {
            let text = normalize_text(&visible_text(element));
            if text.chars().count() > rule.min_chars {
                return text;
            }
        }
    }
    // No candidate cleared its threshold: whatever text the body holds is
    // still better than reporting "no content".
    body_text(doc)
}

fn body_text(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|element| normalize_text(&visible_text(element)))
        .unwrap_or_default()
}

fn document_title(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// First non-empty trimmed value across the selector list. A `content`
/// attribute wins over element text; element text is only consulted when
/// `allow_text` is set (author lookups include structural fallbacks such as
/// `.byline`, description lookups are meta-tag only).
fn first_metadata_value(doc: &Html, selectors: &[String], allow_text: bool) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            client_warn!("skipping unparsable metadata selector {:?}", raw);
            continue;
        };
        let Some(element) = doc.select(&selector).next() else {
            continue;
        };
        let attr_value = element
            .attr("content")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let value = attr_value.or_else(|| {
            if !allow_text {
                return None;
            }
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        if value.is_some() {
            return value;
        }
    }
    None
}

// Subtrees that never contribute visible text.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// Elements whose boundaries end a paragraph in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Raw visible text of an element subtree: text nodes concatenated, with
/// block boundaries marked as blank lines for `normalize_text` to keep.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(*element, &mut out);
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if INVISIBLE_TAGS.contains(&name) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&name);
                if is_block {
                    out.push_str("\n\n");
                }
                collect_text(child, out);
                if is_block {
                    out.push_str("\n\n");
                }
            }
            _ => {}
        }
    }
}

/// Two-pass whitespace normalization: a run containing two or more newlines
/// becomes exactly one blank line, any other run becomes a single space, and
/// the ends are trimmed. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace_run = false;
    let mut newlines_in_run = 0usize;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            in_whitespace_run = true;
            if ch == '\n' {
                newlines_in_run += 1;
            }
            continue;
        }
        if in_whitespace_run && !out.is_empty() {
            if newlines_in_run >= 2 {
                out.push_str("\n\n");
            } else {
                out.push(' ');
            }
        }
        out.push(ch);
        in_whitespace_run = false;
        newlines_in_run = 0;
    }
    out
}
