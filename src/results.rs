use crate::validate::{Severity, ValidationIssue};

/// Outcome of checking one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// Where the record came from (file path or slug)
    pub origin: String,

    /// Slug of the record, when it could be read
    pub slug: Option<String>,

    /// Number of FAQ rows on the record
    pub faq_count: usize,

    /// Findings in the order they were produced
    pub issues: Vec<ValidationIssue>,

    /// Set when the record could not be loaded at all
    pub load_error: Option<String>,
}

impl RecordReport {
    /// Create a report for a record that was checked
    pub fn new(
        origin: impl Into<String>,
        slug: impl Into<String>,
        faq_count: usize,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        Self {
            origin: origin.into(),
            slug: Some(slug.into()),
            faq_count,
            issues,
            load_error: None,
        }
    }

    /// Create a report for a record that could not be read
    pub fn unreadable(origin: impl Into<String>, error: impl ToString) -> Self {
        Self {
            origin: origin.into(),
            slug: None,
            faq_count: 0,
            issues: Vec::new(),
            load_error: Some(error.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.load_error.is_none() && !self.issues.iter().any(ValidationIssue::is_fatal)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// The single stdout line for this record
    pub fn line(&self) -> String {
        if let Some(error) = &self.load_error {
            return format!("ERROR {}: {}", self.origin, error);
        }

        if self.passed() {
            return format!("OK {} ({} FAQ(s))", self.origin, self.faq_count);
        }

        let messages = self.errors().map(|i| i.to_string()).collect::<Vec<_>>();
        format!("ERROR {}: {}", self.origin, messages.join("; "))
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    pub fn new(records: Vec<RecordReport>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: RecordReport) {
        self.records.push(record);
    }

    pub fn failing_count(&self) -> usize {
        self.records.iter().filter(|r| !r.passed()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.records.iter().map(|r| r.warnings().count()).sum()
    }

    pub fn passed(&self) -> bool {
        self.failing_count() == 0
    }

    /// One line summing up the run
    pub fn summary(&self) -> String {
        format!(
            "{} record(s) checked, {} failing, {} warning(s)",
            self.records.len(),
            self.failing_count(),
            self.warning_count()
        )
    }
}
