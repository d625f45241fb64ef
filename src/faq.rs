use serde::{Deserialize, Serialize};
use std::fmt;

/// One FAQ row as authored, accepting either field spelling
///
/// Content sources write `q`/`a` or `question`/`answer`. Only the fields that
/// were present are written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFaq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
}

impl RawFaq {
    /// Create a row using the short field names
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            q: Some(question.into()),
            a: Some(answer.into()),
            ..Self::default()
        }
    }

    /// Question text, preferring `question` over `q`
    pub fn question_text(&self) -> Option<&str> {
        self.question.as_deref().or(self.q.as_deref())
    }

    /// Answer text, preferring `answer` over `a`
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_deref().or(self.a.as_deref())
    }

    /// Text of one field
    pub fn text(&self, field: FaqField) -> Option<&str> {
        match field {
            FaqField::Question => self.question_text(),
            FaqField::Answer => self.answer_text(),
        }
    }

    /// Map to the canonical entry; a missing field becomes empty text
    pub fn to_entry(&self) -> FaqEntry {
        FaqEntry {
            question: self.question_text().unwrap_or_default().to_string(),
            answer: self.answer_text().unwrap_or_default().to_string(),
        }
    }
}

/// Canonical question/answer pair, text kept exactly as authored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl From<&RawFaq> for FaqEntry {
    fn from(raw: &RawFaq) -> Self {
        raw.to_entry()
    }
}

/// Which half of an FAQ row an issue points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqField {
    Question,
    Answer,
}

impl FaqField {
    pub const ALL: [FaqField; 2] = [FaqField::Question, FaqField::Answer];
}

impl fmt::Display for FaqField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaqField::Question => f.write_str("question"),
            FaqField::Answer => f.write_str("answer"),
        }
    }
}
