//! Writing FAQ structured data into static HTML.
//!
//! Generation stays a pure function over FAQ rows; this module is the thin
//! adapter that places its output in a page's `<head>`.

use crate::jsonld;
use regex::{Captures, Regex};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static STRUCTURED_DATA_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script\b[^>]*type\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script>"#,
    )
    .expect("structured-data script pattern should be valid")
});

static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head>").expect("head pattern should be valid"));

/// What happened to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectAction {
    /// An existing FAQPage block was rewritten
    Replaced,
    /// No FAQPage block existed; one was added
    Injected,
    /// The document already carried exactly this block
    Unchanged,
}

impl InjectAction {
    pub fn label(&self) -> &'static str {
        match self {
            InjectAction::Replaced => "REPLACED",
            InjectAction::Injected => "INJECTED",
            InjectAction::Unchanged => "UNCHANGED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub html: String,
    pub action: InjectAction,
}

/// The script element carrying a serialized FAQPage document
pub fn faq_script_tag(document_json: &str) -> String {
    format!(
        "<script type=\"application/ld+json\" id=\"faq-jsonld\">\n{}\n</script>",
        document_json.replace("</", "<\\/")
    )
}

/// Put the given FAQPage document into an HTML page
///
/// The first FAQPage block is replaced, later FAQPage blocks are removed, and
/// other structured-data blocks are left alone. Without any FAQPage block the
/// script goes right before `</head>`, or at the very top when there is no head.
pub fn inject_faq_jsonld(html: &str, document_json: &str) -> Injection {
    let tag = faq_script_tag(document_json);
    let mut found = false;

    let rewritten = STRUCTURED_DATA_SCRIPT.replace_all(html, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let body = caps.get(1).map_or("", |m| m.as_str());
        let is_faq = serde_json::from_str::<Value>(body.trim())
            .ok()
            .is_some_and(|v| jsonld::find_faq_page(&v).is_some());

        if !is_faq {
            return whole.to_string();
        }
        if found {
            return String::new();
        }
        found = true;
        tag.clone()
    });

    if found {
        let action = if rewritten == html {
            InjectAction::Unchanged
        } else {
            InjectAction::Replaced
        };
        return Injection {
            html: rewritten.into_owned(),
            action,
        };
    }

    let html = if HEAD_CLOSE.is_match(html) {
        HEAD_CLOSE
            .replacen(html, 1, |_: &Captures| format!("{tag}\n</head>"))
            .into_owned()
    } else {
        format!("{tag}\n{html}")
    };
    Injection {
        html,
        action: InjectAction::Injected,
    }
}

/// A prerendered HTML file on disk
#[derive(Debug, Clone)]
pub struct StaticHtmlTarget {
    path: PathBuf,
}

impl StaticHtmlTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file so it carries the document; untouched when unchanged
    pub fn apply(&self, document_json: &str) -> std::io::Result<InjectAction> {
        let html = fs::read_to_string(&self.path)?;
        let injection = inject_faq_jsonld(&html, document_json);
        if injection.action != InjectAction::Unchanged {
            fs::write(&self.path, injection.html)?;
        }
        Ok(injection.action)
    }
}
