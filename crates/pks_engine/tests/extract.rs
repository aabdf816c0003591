use pks_engine::{CandidateRule, ExtractSettings, ExtractedContent, Extractor, PageExtractor};
use pretty_assertions::assert_eq;
use scraper::Html;

fn extract(html: &str) -> ExtractedContent {
    let extractor = PageExtractor::default();
    let doc = Html::parse_document(html);
    extractor.extract(&doc, "https://example.com/page")
}

#[test]
fn article_beats_much_larger_boilerplate_body() {
    let article_text = "word ".repeat(100); // ~500 chars of real content
    let boilerplate = "menu ".repeat(10_000); // ~50k chars of chrome
    let html = format!(
        "<html><body><nav>{boilerplate}</nav><article><p>{article_text}</p></article></body></html>"
    );

    let extracted = extract(&html);

    assert_eq!(extracted.content, article_text.trim());
}

#[test]
fn candidate_order_is_priority_not_document_order() {
    let early = "early div content ".repeat(20);
    let late = "late article content ".repeat(20);
    // The .content div comes first in the document; article still wins.
    let html = format!(
        "<html><body><div class=\"content\"><p>{early}</p></div><article><p>{late}</p></article></body></html>"
    );

    let extracted = extract(&html);

    assert_eq!(extracted.content, late.trim());
}

#[test]
fn main_is_used_when_no_article_exists() {
    let text = "main region text ".repeat(20);
    let html = format!("<html><body><main><p>{text}</p></main></body></html>");

    assert_eq!(extract(&html).content, text.trim());
}

#[test]
fn below_threshold_candidates_fall_back_to_body() {
    let html = "<html><body>\
        <article>tiny</article>\
        <p>also short</p>\
        </body></html>";

    let extracted = extract(html);

    // No candidate clears 100 chars; the body text is still returned.
    assert!(extracted.content.contains("tiny"));
    assert!(extracted.content.contains("also short"));
}

#[test]
fn empty_page_yields_empty_content_without_failing() {
    let extracted = extract("<html><head></head><body></body></html>");

    assert_eq!(extracted.content, "");
    assert_eq!(extracted.title, "");
    assert_eq!(extracted.author, None);
    assert_eq!(extracted.description, None);
}

#[test]
fn script_and_style_text_is_invisible() {
    let text = "visible paragraph text ".repeat(10);
    let html = format!(
        "<html><body><article><script>var hidden = 1;</script><style>.x{{}}</style><p>{text}</p></article></body></html>"
    );

    let extracted = extract(&html);

    assert!(!extracted.content.contains("hidden"));
    assert_eq!(extracted.content, text.trim());
}

#[test]
fn paragraph_structure_survives_normalization() {
    let first = "first paragraph sentence ".repeat(5);
    let second = "second paragraph sentence ".repeat(5);
    let html = format!(
        "<html><body><article>\n  <p>{first}</p>\n  <p>{second}</p>\n</article></body></html>"
    );

    let extracted = extract(&html);

    assert_eq!(
        extracted.content,
        format!("{}\n\n{}", first.trim(), second.trim())
    );
}

#[test]
fn title_and_url_are_reported() {
    let html = "<html><head><title>  My Page  </title></head><body></body></html>";
    let extracted = extract(html);

    assert_eq!(extracted.title, "My Page");
    assert_eq!(extracted.url, "https://example.com/page");
}

#[test]
fn author_meta_content_wins_over_byline_text() {
    let html = "<html><head><meta name=\"author\" content=\"Ada Lovelace\"></head>\
        <body><span class=\"byline\">Someone Else</span></body></html>";

    assert_eq!(extract(html).author.as_deref(), Some("Ada Lovelace"));
}

#[test]
fn author_falls_back_to_structural_byline() {
    let html = "<html><body><span class=\"byline\">  Grace Hopper </span></body></html>";

    assert_eq!(extract(html).author.as_deref(), Some("Grace Hopper"));
}

#[test]
fn empty_meta_values_do_not_shadow_later_selectors() {
    let html = "<html><head>\
        <meta name=\"description\" content=\"\">\
        <meta property=\"og:description\" content=\"A real summary\">\
        </head><body></body></html>";

    assert_eq!(extract(html).description.as_deref(), Some("A real summary"));
}

#[test]
fn unmatched_metadata_is_none_not_empty() {
    let html = "<html><body><p>no metadata anywhere</p></body></html>";
    let extracted = extract(html);

    assert_eq!(extracted.author, None);
    assert_eq!(extracted.description, None);
}

#[test]
fn custom_candidate_table_is_honored() {
    let settings = ExtractSettings {
        candidates: vec![CandidateRule::new(".note", 10)],
        ..ExtractSettings::default()
    };
    let extractor = PageExtractor::new(settings);
    let html = "<html><body>\
        <div class=\"note\">a short but sufficient note</div>\
        <p>other body text</p>\
        </body></html>";
    let doc = Html::parse_document(html);

    let extracted = extractor.extract(&doc, "https://example.com");

    assert_eq!(extracted.content, "a short but sufficient note");
}

#[test]
fn custom_threshold_still_gates_acceptance() {
    let settings = ExtractSettings {
        candidates: vec![CandidateRule::new(".note", 40)],
        ..ExtractSettings::default()
    };
    let extractor = PageExtractor::new(settings);
    let html = "<html><body>\
        <div class=\"note\">too short</div>\
        <p>body fallback text</p>\
        </body></html>";
    let doc = Html::parse_document(html);

    let extracted = extractor.extract(&doc, "https://example.com");

    // The note misses its 40-char floor, so the body fallback applies.
    assert!(extracted.content.contains("body fallback text"));
}
