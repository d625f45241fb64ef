use crate::faq::{FaqEntry, RawFaq};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One content page as held by the content store
///
/// Only `slug`, `faqs` and the structured-data blob take part in parity
/// checks. Every other authored field is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Store key and URL path segment
    #[serde(default)]
    pub slug: String,

    #[serde(
        default,
        rename = "meta_title",
        alias = "title",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        alias = "metaDescription",
        skip_serializing_if = "Option::is_none"
    )]
    pub meta_description: Option<String>,

    #[serde(
        default,
        rename = "h1",
        alias = "heading",
        skip_serializing_if = "Option::is_none"
    )]
    pub heading: Option<String>,

    /// Ordered FAQ rows, positionally matched against the structured data
    #[serde(default, deserialize_with = "deserialize_faqs")]
    pub faqs: Vec<RawFaq>,

    /// Serialized FAQPage document derived from `faqs`
    #[serde(
        default,
        rename = "jsonld",
        alias = "jsonLd",
        alias = "jsonLD",
        alias = "structuredData",
        deserialize_with = "deserialize_structured_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_data: Option<String>,

    /// Remaining body sections (hook, bullets, video, ...)
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

impl PageRecord {
    /// Create a record with just a slug and its FAQ rows
    pub fn new(slug: impl Into<String>, faqs: Vec<RawFaq>) -> Self {
        Self {
            slug: slug.into(),
            faqs,
            ..Self::default()
        }
    }

    /// Canonical view of the FAQ rows
    pub fn entries(&self) -> Vec<FaqEntry> {
        self.faqs.iter().map(FaqEntry::from).collect()
    }

    pub fn has_faqs(&self) -> bool {
        !self.faqs.is_empty()
    }
}

/// A `null` FAQ list reads as empty, and `null` rows are dropped
fn deserialize_faqs<'de, D>(deserializer: D) -> Result<Vec<RawFaq>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<RawFaq>>>::deserialize(deserializer)?;
    Ok(rows.unwrap_or_default().into_iter().flatten().collect())
}

/// Structured data is normally a JSON string, but some sources inline the object
fn deserialize_structured_data<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_authored_record() {
        let raw = r#"{
            "slug": "fight-speeding-ticket-calgary",
            "meta_title": "Fight a Speeding Ticket",
            "h1": "Speeding tickets",
            "hook": "Most tickets can be reduced.",
            "faqs": [{"q": "Can I fight it?", "a": "Yes."}],
            "jsonld": "{\"@type\":\"FAQPage\"}"
        }"#;
        let record: PageRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.slug, "fight-speeding-ticket-calgary");
        assert_eq!(record.title.as_deref(), Some("Fight a Speeding Ticket"));
        assert_eq!(record.heading.as_deref(), Some("Speeding tickets"));
        assert_eq!(record.faqs.len(), 1);
        assert_eq!(
            record.structured_data.as_deref(),
            Some("{\"@type\":\"FAQPage\"}")
        );
        assert_eq!(
            record.sections.get("hook"),
            Some(&Value::String("Most tickets can be reduced.".to_string()))
        );
    }

    #[test]
    fn test_structured_data_aliases_and_inline_objects() {
        let record: PageRecord =
            serde_json::from_str(r#"{"slug":"a","structuredData":{"@type":"FAQPage"}}"#).unwrap();
        assert_eq!(
            record.structured_data.as_deref(),
            Some(r#"{"@type":"FAQPage"}"#)
        );

        let record: PageRecord = serde_json::from_str(r#"{"slug":"a","jsonld":"  "}"#).unwrap();
        assert_eq!(record.structured_data, None);

        let record: PageRecord = serde_json::from_str(r#"{"slug":"a","jsonld":null}"#).unwrap();
        assert_eq!(record.structured_data, None);
    }

    #[test]
    fn test_null_faqs() {
        let record: PageRecord =
            serde_json::from_str(r#"{"slug":"a","faqs":[null,{"q":"Q","a":"A"}]}"#).unwrap();
        assert_eq!(record.faqs.len(), 1);

        let record: PageRecord = serde_json::from_str(r#"{"slug":"a","faqs":null}"#).unwrap();
        assert!(!record.has_faqs());
    }

    #[test]
    fn test_round_trip_keeps_authored_keys() {
        let raw = r#"{"slug":"a","meta_title":"T","h1":"H","faqs":[],"video":{"id":"x"}}"#;
        let record: PageRecord = serde_json::from_str(raw).unwrap();
        let written: Value = serde_json::to_value(&record).unwrap();

        assert_eq!(written["meta_title"], "T");
        assert_eq!(written["h1"], "H");
        assert_eq!(written["video"]["id"], "x");
        assert!(written.get("jsonld").is_none());
    }
}
