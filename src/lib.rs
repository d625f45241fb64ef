// Re-export modules
pub mod config;
pub mod faq;
pub mod filter;
pub mod inject;
pub mod jsonld;
pub mod page;
pub mod pages;
pub mod parsers;
pub mod render;
pub mod rendered;
pub mod results;
pub mod store;
pub mod sync;
pub mod utils;
pub mod validate;

// Re-export commonly used types for convenience
pub use faq::{FaqEntry, FaqField, RawFaq};
pub use inject::{InjectAction, StaticHtmlTarget, inject_faq_jsonld};
pub use jsonld::{FaqPageDocument, generate};
pub use page::PageRecord;
pub use rendered::{validate_rendered, validate_rendered_page};
pub use results::{BatchReport, RecordReport};
pub use store::{DirectoryStore, MemoryStore, PageStore, StoreError};
pub use sync::{SyncOptions, SyncSummary, regenerate_structured_data, sync_store};
pub use validate::{Rules, ValidationIssue, validate, validate_with};
