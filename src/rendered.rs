//! Parity check against fully rendered HTML.
//!
//! Weaker than the positional record check: it only asks whether each
//! structured-data string appears somewhere in the page's visible text.

use crate::faq::FaqField;
use crate::jsonld;
use crate::parsers::{html, text};
use crate::validate::ValidationIssue;

/// Check rendered HTML for a page that is expected to carry FAQs
pub fn validate_rendered(html: &str) -> Vec<ValidationIssue> {
    validate_rendered_page(html, true)
}

/// Check rendered HTML; a page without FAQs may lack the FAQPage block
pub fn validate_rendered_page(html: &str, expect_faqs: bool) -> Vec<ValidationIssue> {
    let blocks = html::structured_data_blocks(html);
    let Some(faq_page) = blocks.iter().find_map(jsonld::find_faq_page) else {
        if expect_faqs {
            return vec![ValidationIssue::StructuredDataNotFound];
        }
        return Vec::new();
    };

    let visible = html::visible_text(html);
    let questions = jsonld::extract_questions(faq_page);
    ::log::debug!(
        "Rendered page has {} structured-data question(s), {} chars of visible text",
        questions.len(),
        visible.len()
    );

    let mut issues = Vec::new();
    for (index, question) in questions.iter().enumerate() {
        let fields = [
            (FaqField::Question, question.name.as_deref()),
            (FaqField::Answer, question.answer.as_deref()),
        ];
        for (field, value) in fields {
            let needle = text::normalize_whitespace(value.unwrap_or_default());
            if needle.is_empty() || !visible.contains(&needle) {
                issues.push(ValidationIssue::VisibleTextMissing { index, field });
            }
        }
    }
    issues
}
