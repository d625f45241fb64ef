//! Record-level parity validation.
//!
//! Checks that a page's structured data reproduces its FAQ rows exactly, in
//! order, and that the rows themselves are clean plain text.

use crate::faq::{FaqField, RawFaq};
use crate::jsonld::{self, ParsedQuestion};
use crate::page::PageRecord;
use crate::parsers::text;
use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// How much a finding matters for pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding about a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// FAQ rows exist but there is no usable structured-data document
    MissingStructuredData { reason: String },
    /// The structured data parses but holds no FAQPage node
    WrongSchemaType,
    /// Number of FAQ rows and Question nodes differ
    CountMismatch { expected: usize, actual: usize },
    QuestionTextMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    AnswerTextMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    /// An FAQ row has no question or no answer
    MissingField { index: usize, field: FaqField },
    MarkupInPlainText { index: usize, field: FaqField },
    UntrimmedWhitespace { index: usize, field: FaqField },
    AnswerLengthWarning {
        index: usize,
        words: usize,
        min: usize,
        max: usize,
    },
    /// The page has fewer FAQ rows than the configured template minimum
    TooFewFaqs { minimum: usize, actual: usize },
    /// Rendered HTML carries no FAQPage structured data
    StructuredDataNotFound,
    /// A structured-data string does not appear in the rendered text
    VisibleTextMissing { index: usize, field: FaqField },
    RenderFailed { reason: String },
    RenderTimeout { timeout: Duration },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::AnswerLengthWarning { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Short stable identifier of the issue kind
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::MissingStructuredData { .. } => "missing-structured-data",
            ValidationIssue::WrongSchemaType => "wrong-schema-type",
            ValidationIssue::CountMismatch { .. } => "count-mismatch",
            ValidationIssue::QuestionTextMismatch { .. } => "question-text-mismatch",
            ValidationIssue::AnswerTextMismatch { .. } => "answer-text-mismatch",
            ValidationIssue::MissingField { .. } => "missing-field",
            ValidationIssue::MarkupInPlainText { .. } => "markup-in-plain-text",
            ValidationIssue::UntrimmedWhitespace { .. } => "untrimmed-whitespace",
            ValidationIssue::AnswerLengthWarning { .. } => "answer-length",
            ValidationIssue::TooFewFaqs { .. } => "too-few-faqs",
            ValidationIssue::StructuredDataNotFound => "structured-data-not-found",
            ValidationIssue::VisibleTextMissing { .. } => "visible-text-missing",
            ValidationIssue::RenderFailed { .. } => "render-failed",
            ValidationIssue::RenderTimeout { .. } => "render-timeout",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingStructuredData { reason } => {
                write!(f, "missing structured data ({reason})")
            }
            ValidationIssue::WrongSchemaType => {
                write!(f, "structured data does not contain a FAQPage node")
            }
            ValidationIssue::CountMismatch { expected, actual } => write!(
                f,
                "count mismatch: {expected} FAQ(s) on page vs {actual} question(s) in structured data"
            ),
            ValidationIssue::QuestionTextMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "faq[{index}] question mismatch: expected \"{expected}\", found \"{actual}\""
            ),
            ValidationIssue::AnswerTextMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "faq[{index}] answer mismatch: expected \"{expected}\", found \"{actual}\""
            ),
            ValidationIssue::MissingField { index, field } => {
                write!(f, "faq[{index}] is missing its {field}")
            }
            ValidationIssue::MarkupInPlainText { index, field } => {
                write!(f, "faq[{index}] {field} contains markup; must be plain text")
            }
            ValidationIssue::UntrimmedWhitespace { index, field } => {
                write!(f, "faq[{index}] {field} has leading or trailing whitespace")
            }
            ValidationIssue::AnswerLengthWarning {
                index,
                words,
                min,
                max,
            } => write!(
                f,
                "faq[{index}] answer is {words} word(s) (recommended {min}-{max})"
            ),
            ValidationIssue::TooFewFaqs { minimum, actual } => {
                write!(f, "page has {actual} FAQ(s), template requires at least {minimum}")
            }
            ValidationIssue::StructuredDataNotFound => {
                write!(f, "no FAQPage structured data found in rendered HTML")
            }
            ValidationIssue::VisibleTextMissing { index, field } => write!(
                f,
                "structured-data question {index} {field} not found verbatim in visible text"
            ),
            ValidationIssue::RenderFailed { reason } => write!(f, "render failed: {reason}"),
            ValidationIssue::RenderTimeout { timeout } => {
                write!(f, "render timed out after {timeout:?}")
            }
        }
    }
}

/// Content policy applied on top of the parity checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Recommended answer length in words
    pub answer_words: RangeInclusive<usize>,
    /// Minimum FAQ rows for pages that have any
    pub min_faqs: Option<usize>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            answer_words: 20..=50,
            min_faqs: None,
        }
    }
}

/// Validate a record with the default rules
pub fn validate(record: &PageRecord) -> Vec<ValidationIssue> {
    validate_with(record, &Rules::default())
}

/// Validate a record's structured data and FAQ rows
pub fn validate_with(record: &PageRecord, rules: &Rules) -> Vec<ValidationIssue> {
    if record.faqs.is_empty() {
        return Vec::new();
    }

    let mut issues = Vec::new();

    check_structured_data(record, &mut issues);

    if let Some(minimum) = rules.min_faqs {
        if record.faqs.len() < minimum {
            issues.push(ValidationIssue::TooFewFaqs {
                minimum,
                actual: record.faqs.len(),
            });
        }
    }

    for (index, faq) in record.faqs.iter().enumerate() {
        check_entry(index, faq, rules, &mut issues);
    }

    issues
}

fn check_structured_data(record: &PageRecord, issues: &mut Vec<ValidationIssue>) {
    let Some(raw) = record.structured_data.as_deref() else {
        issues.push(ValidationIssue::MissingStructuredData {
            reason: "no structured data on record".to_string(),
        });
        return;
    };

    let document: Value = match serde_json::from_str(raw.trim()) {
        Ok(document) => document,
        Err(err) => {
            issues.push(ValidationIssue::MissingStructuredData {
                reason: format!("not valid JSON: {err}"),
            });
            return;
        }
    };

    if !(document.is_object() || document.is_array()) {
        issues.push(ValidationIssue::MissingStructuredData {
            reason: "not a JSON object".to_string(),
        });
        return;
    }

    let Some(faq_page) = jsonld::find_faq_page(&document) else {
        issues.push(ValidationIssue::WrongSchemaType);
        return;
    };

    let questions = jsonld::extract_questions(faq_page);
    compare_positions(&record.faqs, &questions, issues);
}

fn compare_positions(
    faqs: &[RawFaq],
    questions: &[ParsedQuestion],
    issues: &mut Vec<ValidationIssue>,
) {
    if faqs.len() != questions.len() {
        issues.push(ValidationIssue::CountMismatch {
            expected: faqs.len(),
            actual: questions.len(),
        });
    }

    for (index, (faq, node)) in faqs.iter().zip(questions).enumerate() {
        let expected = text::normalize_whitespace(faq.question_text().unwrap_or_default());
        let actual = text::normalize_whitespace(node.name.as_deref().unwrap_or_default());
        if expected != actual {
            issues.push(ValidationIssue::QuestionTextMismatch {
                index,
                expected,
                actual,
            });
        }

        let expected = text::normalize_whitespace(faq.answer_text().unwrap_or_default());
        let actual = text::normalize_whitespace(node.answer.as_deref().unwrap_or_default());
        if expected != actual {
            issues.push(ValidationIssue::AnswerTextMismatch {
                index,
                expected,
                actual,
            });
        }
    }
}

fn check_entry(index: usize, faq: &RawFaq, rules: &Rules, issues: &mut Vec<ValidationIssue>) {
    for field in FaqField::ALL {
        let value = match faq.text(field) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                issues.push(ValidationIssue::MissingField { index, field });
                continue;
            }
        };

        if text::contains_markup(value) {
            issues.push(ValidationIssue::MarkupInPlainText { index, field });
        }
        if !text::is_trimmed(value) {
            issues.push(ValidationIssue::UntrimmedWhitespace { index, field });
        }
        if field == FaqField::Answer {
            let words = text::word_count(value);
            if !rules.answer_words.contains(&words) {
                issues.push(ValidationIssue::AnswerLengthWarning {
                    index,
                    words,
                    min: *rules.answer_words.start(),
                    max: *rules.answer_words.end(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::{FaqPageDocument, QuestionNode};

    const LONG_ANSWER: &str = "Yes. Most speeding tickets in Alberta can be disputed, and many are \
        reduced or withdrawn when the evidence is reviewed carefully before your first court date.";

    fn record_with(faqs: Vec<RawFaq>) -> PageRecord {
        let mut record = PageRecord::new("fight-speeding-ticket-calgary", faqs);
        record.structured_data = jsonld::generate(&record.faqs).map(|d| d.to_canonical_string());
        record
    }

    fn six_faqs() -> Vec<RawFaq> {
        (1..=6)
            .map(|i| RawFaq::new(format!("Question number {i}?"), LONG_ANSWER))
            .collect()
    }

    fn fatal(issues: &[ValidationIssue]) -> Vec<&ValidationIssue> {
        issues.iter().filter(|i| i.is_fatal()).collect()
    }

    #[test]
    fn test_no_faqs_is_exempt() {
        let mut record = PageRecord::new("about", Vec::new());
        record.structured_data = Some("not even json".to_string());
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_generated_record_passes() {
        let record = record_with(six_faqs());
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_fee_scenario_only_warns() {
        let record = record_with(vec![RawFaq::new(
            "What is the fee?",
            "The fee is 488 dollars, paid only if we win your case and reduce the ticket.",
        )]);
        let issues = validate(&record);

        assert!(fatal(&issues).is_empty());
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0],
            ValidationIssue::AnswerLengthWarning { index: 0, words, .. } if words < 20
        ));
    }

    #[test]
    fn test_missing_structured_data() {
        let mut record = record_with(six_faqs());
        record.structured_data = None;
        let issues = validate(&record);

        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0],
            ValidationIssue::MissingStructuredData { .. }
        ));
    }

    #[test]
    fn test_unparseable_structured_data() {
        let mut record = record_with(six_faqs());
        record.structured_data = Some("{\"@type\": \"FAQPage\"".to_string());
        let issues = validate(&record);
        assert!(matches!(
            issues.as_slice(),
            [ValidationIssue::MissingStructuredData { .. }]
        ));
    }

    #[test]
    fn test_wrong_schema_type() {
        let mut record = record_with(six_faqs());
        record.structured_data = Some(r#"{"@type":"Article","headline":"x"}"#.to_string());
        assert_eq!(validate(&record), vec![ValidationIssue::WrongSchemaType]);
    }

    #[test]
    fn test_count_mismatch() {
        let faqs: Vec<RawFaq> = six_faqs().into_iter().take(4).collect();
        let mut record = record_with(faqs.clone());
        record.structured_data = jsonld::generate(&faqs[..3]).map(|d| d.to_canonical_string());

        let issues = validate(&record);
        let counts: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i, ValidationIssue::CountMismatch { .. }))
            .collect();
        assert_eq!(
            counts,
            vec![&ValidationIssue::CountMismatch {
                expected: 4,
                actual: 3
            }]
        );
        assert_eq!(fatal(&issues).len(), 1);
    }

    #[test]
    fn test_question_text_mismatch() {
        let mut record = record_with(vec![RawFaq::new("How do I pay?", LONG_ANSWER)]);
        let doc = FaqPageDocument::new(vec![QuestionNode::new("How can I pay?", LONG_ANSWER)]);
        record.structured_data = Some(doc.to_canonical_string());

        assert_eq!(
            validate(&record),
            vec![ValidationIssue::QuestionTextMismatch {
                index: 0,
                expected: "How do I pay?".to_string(),
                actual: "How can I pay?".to_string(),
            }]
        );
    }

    #[test]
    fn test_answer_text_mismatch_after_prefix() {
        let mut faqs = six_faqs();
        let mut record = record_with(faqs.clone());
        faqs[2] = RawFaq::new("Question number 3?", "Something else entirely.");
        record.structured_data = jsonld::generate(&faqs).map(|d| d.to_canonical_string());

        let issues = validate(&record);
        assert!(issues.contains(&ValidationIssue::AnswerTextMismatch {
            index: 2,
            expected: text::normalize_whitespace(LONG_ANSWER),
            actual: "Something else entirely.".to_string(),
        }));
    }

    #[test]
    fn test_whitespace_normalized_comparison() {
        let mut record = record_with(vec![RawFaq::new("How do I pay?", LONG_ANSWER)]);
        let doc = FaqPageDocument::new(vec![QuestionNode::new("How  do I\npay?", LONG_ANSWER)]);
        record.structured_data = Some(doc.to_canonical_string());
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_markup_rejected_regardless_of_structured_data() {
        let answer = format!("Click <b>here</b> {LONG_ANSWER}");
        let with_data = record_with(vec![RawFaq::new("How do I pay?", answer.clone())]);
        let mut without_data = with_data.clone();
        without_data.structured_data = None;

        for record in [with_data, without_data] {
            assert!(validate(&record).contains(&ValidationIssue::MarkupInPlainText {
                index: 0,
                field: FaqField::Answer,
            }));
        }
    }

    #[test]
    fn test_untrimmed_and_missing_fields() {
        let mut record = PageRecord::new(
            "page",
            vec![
                RawFaq::new(" How do I pay? ", LONG_ANSWER),
                RawFaq {
                    q: Some("No answer?".to_string()),
                    ..RawFaq::default()
                },
            ],
        );
        record.structured_data = jsonld::generate(&record.faqs).map(|d| d.to_canonical_string());

        let issues = validate(&record);
        assert!(issues.contains(&ValidationIssue::UntrimmedWhitespace {
            index: 0,
            field: FaqField::Question,
        }));
        assert!(issues.contains(&ValidationIssue::MissingField {
            index: 1,
            field: FaqField::Answer,
        }));
        // The partial row is dropped by the generator, so counts differ too.
        assert!(issues.contains(&ValidationIssue::CountMismatch {
            expected: 2,
            actual: 1,
        }));
    }

    #[test]
    fn test_min_faqs_policy() {
        let rules = Rules {
            min_faqs: Some(6),
            ..Rules::default()
        };
        let short: Vec<RawFaq> = six_faqs().into_iter().take(5).collect();
        let issues = validate_with(&record_with(short), &rules);
        assert_eq!(
            issues,
            vec![ValidationIssue::TooFewFaqs {
                minimum: 6,
                actual: 5
            }]
        );

        assert!(validate_with(&record_with(six_faqs()), &rules).is_empty());
        assert!(validate_with(&PageRecord::new("empty", Vec::new()), &rules).is_empty());
    }

    #[test]
    fn test_policy_follows_structured_data_checks() {
        let rules = Rules {
            min_faqs: Some(6),
            ..Rules::default()
        };
        let mut record = record_with(six_faqs().into_iter().take(5).collect());
        record.structured_data = None;

        let issues = validate_with(&record, &rules);
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0],
            ValidationIssue::MissingStructuredData { .. }
        ));
        assert_eq!(
            issues[1],
            ValidationIssue::TooFewFaqs {
                minimum: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_issue_display_carries_index() {
        let issue = ValidationIssue::QuestionTextMismatch {
            index: 0,
            expected: "How do I pay?".to_string(),
            actual: "How can I pay?".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "faq[0] question mismatch: expected \"How do I pay?\", found \"How can I pay?\""
        );
        assert_eq!(issue.code(), "question-text-mismatch");
    }
}
