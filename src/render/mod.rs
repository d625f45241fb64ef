//! Rendering pages and checking the result.
//!
//! A [`Renderer`] turns a route into fully rendered HTML. Two live here: a
//! WebDriver session against a running site and a directory of prerendered
//! files. [`check_rendered_pages`] drives either one over a batch of records.

pub mod files;
pub mod web;

pub use files::PrerenderedDirectory;
pub use web::WebDriverRenderer;

use crate::page::PageRecord;
use crate::rendered::validate_rendered_page;
use crate::results::{BatchReport, RecordReport};
use crate::utils::route_for_slug;
use crate::validate::ValidationIssue;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No WebDriver server accepted a session
    #[error("could not connect to a WebDriver server at {0}")]
    Connect(String),

    #[error("failed to load {route}: {reason}")]
    Navigation { route: String, reason: String },

    /// The prerendered file for a route does not exist
    #[error("no prerendered page at {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Produces the final HTML for a route
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&mut self, route: &str) -> Result<String, RenderError>;
}

/// Render and check each record's route
///
/// Every page gets at most `page_timeout`. A page that times out or fails to
/// render is reported as failing and the batch moves on.
pub async fn check_rendered_pages<R: Renderer>(
    renderer: &mut R,
    records: &[PageRecord],
    route_prefix: &str,
    page_timeout: Duration,
) -> BatchReport {
    ::log::info!("Checking {} rendered page(s)", records.len());
    let start_time = std::time::Instant::now();
    let mut report = BatchReport::default();

    for record in records {
        let route = route_for_slug(&record.slug, route_prefix);
        ::log::debug!("Rendering {} for {}", route, record.slug);

        let issues = match timeout(page_timeout, renderer.render(&route)).await {
            Ok(Ok(html)) => validate_rendered_page(&html, record.has_faqs()),
            Ok(Err(error)) => {
                ::log::warn!("{} - render failed: {}", route, error);
                vec![ValidationIssue::RenderFailed {
                    reason: error.to_string(),
                }]
            }
            Err(_) => {
                ::log::warn!("{} - render timed out after {:?}", route, page_timeout);
                vec![ValidationIssue::RenderTimeout {
                    timeout: page_timeout,
                }]
            }
        };

        report.push(RecordReport::new(
            route,
            record.slug.as_str(),
            record.faqs.len(),
            issues,
        ));
    }

    ::log::info!(
        "Rendered check complete - {} page(s) in {:.2} seconds",
        records.len(),
        start_time.elapsed().as_secs_f64()
    );
    report
}
