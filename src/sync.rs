//! Regenerate FAQ structured data for stored pages.

use crate::jsonld;
use crate::page::PageRecord;
use crate::store::{PageStore, StoreError};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Count what would change without writing anything
    pub dry_run: bool,
    /// Attempts per record for retryable write errors
    pub max_write_attempts: usize,
    /// Delay before the first retry; doubles on each further retry
    pub retry_backoff: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_write_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// A record whose new structured data could not be stored
#[derive(Debug)]
pub struct SyncFailure {
    pub slug: String,
    pub error: StoreError,
}

/// What a regeneration run did
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Records whose structured data changed
    pub updated: usize,
    /// Records whose structured data already matched
    pub unchanged: usize,
    /// Records with no usable FAQ rows
    pub skipped: usize,
    pub failed: Vec<SyncFailure>,
}

impl SyncSummary {
    pub fn changed_anything(&self) -> bool {
        self.updated > 0
    }
}

/// Regenerate and store structured data for each record
///
/// A record counts as `updated` when the generated document differs
/// structurally from what it carries, `unchanged` when it matches, and
/// `skipped` when the generator produces nothing. Skipped records are never
/// written.
pub fn regenerate_structured_data<S: PageStore + ?Sized>(
    store: &mut S,
    records: &[PageRecord],
    options: &SyncOptions,
) -> SyncSummary {
    let mut summary = SyncSummary::default();

    for record in records {
        let Some(document) = jsonld::generate(&record.faqs) else {
            ::log::info!("{} - no valid FAQs, skipping", record.slug);
            summary.skipped += 1;
            continue;
        };

        if is_current(record, &document.to_value()) {
            ::log::debug!("{} - structured data already up to date", record.slug);
            summary.unchanged += 1;
            continue;
        }

        if options.dry_run {
            ::log::info!("{} - structured data out of date", record.slug);
            summary.updated += 1;
            continue;
        }

        match persist_with_retry(store, &record.slug, &document.to_canonical_string(), options) {
            Ok(()) => {
                ::log::info!(
                    "{} - structured data updated ({} FAQs)",
                    record.slug,
                    document.question_count()
                );
                summary.updated += 1;
            }
            Err(error) => {
                ::log::error!("{} - failed to store structured data: {}", record.slug, error);
                summary.failed.push(SyncFailure {
                    slug: record.slug.clone(),
                    error,
                });
            }
        }
    }

    summary
}

/// Fetch every record from the store and regenerate
///
/// An unreachable store aborts the run before anything is written.
pub fn sync_store<S: PageStore + ?Sized>(
    store: &mut S,
    options: &SyncOptions,
) -> Result<SyncSummary, StoreError> {
    let records = store.fetch_all()?;
    ::log::info!("Regenerating structured data for {} page(s)", records.len());
    Ok(regenerate_structured_data(store, &records, options))
}

fn is_current(record: &PageRecord, generated: &Value) -> bool {
    record
        .structured_data
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Value>(raw.trim()).ok())
        .is_some_and(|existing| &existing == generated)
}

fn persist_with_retry<S: PageStore + ?Sized>(
    store: &mut S,
    slug: &str,
    structured_data: &str,
    options: &SyncOptions,
) -> Result<(), StoreError> {
    let attempts = options.max_write_attempts.max(1);
    let mut backoff = options.retry_backoff;

    let mut attempt = 1;
    loop {
        match store.persist(slug, structured_data) {
            Ok(()) => return Ok(()),
            Err(error) if error.is_retryable() && attempt < attempts => {
                ::log::warn!(
                    "{} - write attempt {} of {} failed: {}; retrying in {:?}",
                    slug,
                    attempt,
                    attempts,
                    error,
                    backoff
                );
                std::thread::sleep(backoff);
                backoff = backoff.saturating_mul(2);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
