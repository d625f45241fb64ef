use crate::parsers::text::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

const STRUCTURED_DATA_TYPE: &str = "application/ld+json";

/// Elements whose text never reaches a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
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
    "summary",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Parses every structured-data script block in the document
///
/// Blocks that are not valid JSON are skipped.
pub fn structured_data_blocks(html: &str) -> Vec<Value> {
    let doc = Html::parse_document(html);

    let script_selector = Selector::parse("script[type]").unwrap();
    let blocks = doc
        .select(&script_selector)
        .filter(|e| {
            e.value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(STRUCTURED_DATA_TYPE))
        })
        .filter_map(|e| {
            let body = e.text().collect::<String>();
            match serde_json::from_str::<Value>(body.trim()) {
                Ok(value) => Some(value),
                Err(err) => {
                    ::log::debug!("Skipping unparseable structured-data block: {}", err);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} structured-data blocks", blocks.len());
    blocks
}

/// Extracts the human-readable text of the document body
///
/// Inline markup is concatenated without separators so that text split by
/// `<strong>` or `<a>` still reads as one phrase. Block elements contribute a
/// word break. Whitespace is collapsed.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let body_selector = Selector::parse("body").unwrap();
    let mut raw = String::new();
    for body in doc.select(&body_selector) {
        push_visible_text(body, &mut raw);
        raw.push(' ');
    }

    normalize_whitespace(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child_element.value().name();
        if HIDDEN_ELEMENTS.contains(&name) {
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push(' ');
        }
        push_visible_text(child_element, out);
        if block {
            out.push(' ');
        }
    }
}
