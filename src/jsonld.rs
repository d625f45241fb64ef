//! FAQPage structured data: generation from FAQ rows and tolerant lookup in
//! documents produced elsewhere.

use crate::faq::RawFaq;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const FAQ_PAGE_TYPE: &str = "FAQPage";
pub const QUESTION_TYPE: &str = "Question";
pub const ANSWER_TYPE: &str = "Answer";

/// Top-level FAQPage document
///
/// Field order is the serialization order, which keeps the canonical string
/// byte-stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqPageDocument {
    #[serde(rename = "@context")]
    pub context: String,

    #[serde(rename = "@type")]
    pub kind: String,

    #[serde(rename = "mainEntity")]
    pub main_entity: Vec<QuestionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionNode {
    #[serde(rename = "@type")]
    pub kind: String,

    pub name: String,

    #[serde(rename = "acceptedAnswer")]
    pub accepted_answer: AnswerNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerNode {
    #[serde(rename = "@type")]
    pub kind: String,

    pub text: String,
}

impl QuestionNode {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: QUESTION_TYPE.to_string(),
            name: name.into(),
            accepted_answer: AnswerNode {
                kind: ANSWER_TYPE.to_string(),
                text: text.into(),
            },
        }
    }
}

impl FaqPageDocument {
    pub fn new(main_entity: Vec<QuestionNode>) -> Self {
        Self {
            context: SCHEMA_CONTEXT.to_string(),
            kind: FAQ_PAGE_TYPE.to_string(),
            main_entity,
        }
    }

    /// Compact JSON in fixed key order
    pub fn to_canonical_string(&self) -> String {
        // Only strings and fixed-shape structs; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn question_count(&self) -> usize {
        self.main_entity.len()
    }
}

/// Builds the FAQPage document for a page's FAQ rows
///
/// Text is trimmed. Rows whose question or answer is empty after trimming are
/// dropped. Returns `None` when no row survives.
pub fn generate(faqs: &[RawFaq]) -> Option<FaqPageDocument> {
    let main_entity = faqs
        .iter()
        .filter_map(|faq| {
            let name = faq.question_text().unwrap_or_default().trim();
            let text = faq.answer_text().unwrap_or_default().trim();
            if name.is_empty() || text.is_empty() {
                return None;
            }
            Some(QuestionNode::new(name, text))
        })
        .collect::<Vec<_>>();

    if main_entity.is_empty() {
        return None;
    }
    Some(FaqPageDocument::new(main_entity))
}

/// Whether a node declares the given `@type`, as a string or within an array
pub fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(kind)) => kind == wanted,
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some(wanted)),
        _ => false,
    }
}

/// Locates the FAQPage node in a structured-data document
///
/// Looks at the top level, then one level into an array, an `@graph` array, or
/// the values of a wrapper object.
pub fn find_faq_page(document: &Value) -> Option<&Value> {
    if has_type(document, FAQ_PAGE_TYPE) {
        return Some(document);
    }

    match document {
        Value::Array(items) => items.iter().find(|item| has_type(item, FAQ_PAGE_TYPE)),
        Value::Object(map) => {
            if let Some(Value::Array(graph)) = map.get("@graph") {
                if let Some(found) = graph.iter().find(|item| has_type(item, FAQ_PAGE_TYPE)) {
                    return Some(found);
                }
            }
            map.values().find(|value| has_type(value, FAQ_PAGE_TYPE))
        }
        _ => None,
    }
}

/// A Question node as found in a document, fields possibly missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub name: Option<String>,
    pub answer: Option<String>,
}

/// Reads the Question nodes of a FAQPage node
///
/// `mainEntity` may be an array or a single object, and `acceptedAnswer` an
/// object or an array whose first element is used.
pub fn extract_questions(faq_page: &Value) -> Vec<ParsedQuestion> {
    let entities: Vec<&Value> = match faq_page.get("mainEntity") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    };

    entities
        .into_iter()
        .map(|entity| {
            let answer_node = match entity.get("acceptedAnswer") {
                Some(Value::Array(answers)) => answers.first(),
                other => other,
            };
            ParsedQuestion {
                name: entity
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                answer: answer_node
                    .and_then(|a| a.get("text"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        })
        .collect()
}
