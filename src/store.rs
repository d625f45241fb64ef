//! Content store keyed by slug.
//!
//! `DirectoryStore` keeps one JSON file per page, the layout the static-page
//! build reads from. `MemoryStore` backs tests and in-process pipelines.

use crate::page::PageRecord;
use crate::utils::sanitize_filename;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or listed
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No record with this slug exists
    #[error("no page with slug '{slug}' in store")]
    NotFound { slug: String },

    /// Writing a record failed; may succeed on retry
    #[error("failed to write '{slug}': {reason}")]
    Write { slug: String, reason: String },

    /// A stored record could not be decoded
    #[error("corrupt record {location}: {reason}")]
    Corrupt { location: String, reason: String },
}

impl StoreError {
    /// Whether retrying the same operation can help
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Write { .. })
    }
}

/// Logical interface to wherever page records live
pub trait PageStore {
    /// Every record, or an error; never a partial list
    fn fetch_all(&self) -> Result<Vec<PageRecord>, StoreError>;

    fn get_by_slug(&self, slug: &str) -> Result<PageRecord, StoreError>;

    /// Insert or replace the record with this slug
    fn upsert(&mut self, record: &PageRecord) -> Result<(), StoreError>;

    /// Replace the structured data of an existing record
    fn persist(&mut self, slug: &str, structured_data: &str) -> Result<(), StoreError> {
        let mut record = self.get_by_slug(slug)?;
        record.structured_data = Some(structured_data.to_string());
        self.upsert(&record)
    }
}

/// A directory of `<slug>.json` page files
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `*.json` files in the directory, sorted by name
    pub fn record_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.root.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.root.display())))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Path a new record with this slug would be written to
    pub fn path_for_slug(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_filename(slug)))
    }

    /// Find the file holding a slug: `<slug>.json` first, then any file whose
    /// record carries the slug
    ///
    /// Only a corrupt `<slug>.json` is an error; unreadable files met while
    /// scanning are skipped.
    fn locate(&self, slug: &str) -> Result<Option<(PathBuf, PageRecord)>, StoreError> {
        let direct = self.path_for_slug(slug);
        if direct.is_file() {
            let record = read_record(&direct)?;
            if record.slug == slug {
                return Ok(Some((direct, record)));
            }
        }

        for path in self.record_paths()? {
            if path == direct {
                continue;
            }
            let record = match read_record(&path) {
                Ok(record) => record,
                Err(e) => {
                    ::log::warn!(
                        "Skipping unreadable record while looking up '{}': {}",
                        slug,
                        e
                    );
                    continue;
                }
            };
            if record.slug == slug {
                return Ok(Some((path, record)));
            }
        }
        Ok(None)
    }
}

impl PageStore for DirectoryStore {
    fn fetch_all(&self) -> Result<Vec<PageRecord>, StoreError> {
        let paths = self.record_paths()?;
        let mut records = Vec::with_capacity(paths.len());
        for path in &paths {
            records.push(read_record(path)?);
        }
        ::log::debug!(
            "Loaded {} record(s) from {}",
            records.len(),
            self.root.display()
        );
        Ok(records)
    }

    fn get_by_slug(&self, slug: &str) -> Result<PageRecord, StoreError> {
        match self.locate(slug)? {
            Some((_, record)) => Ok(record),
            None => Err(StoreError::NotFound {
                slug: slug.to_string(),
            }),
        }
    }

    fn upsert(&mut self, record: &PageRecord) -> Result<(), StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "{}: not a directory",
                self.root.display()
            )));
        }
        let path = match self.locate(&record.slug)? {
            Some((path, _)) => path,
            None => self.path_for_slug(&record.slug),
        };
        write_record(&path, record).map_err(|reason| StoreError::Write {
            slug: record.slug.clone(),
            reason,
        })
    }

    fn persist(&mut self, slug: &str, structured_data: &str) -> Result<(), StoreError> {
        let Some((path, mut record)) = self.locate(slug)? else {
            return Err(StoreError::NotFound {
                slug: slug.to_string(),
            });
        };
        record.structured_data = Some(structured_data.to_string());
        write_record(&path, &record).map_err(|reason| StoreError::Write {
            slug: slug.to_string(),
            reason,
        })
    }
}

/// Read one page file; a missing slug falls back to the file stem
pub fn read_record(path: &Path) -> Result<PageRecord, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        location: path.display().to_string(),
        reason,
    };
    let contents = fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
    let mut record: PageRecord =
        serde_json::from_str(&contents).map_err(|e| corrupt(e.to_string()))?;

    if record.slug.trim().is_empty() {
        record.slug = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(record)
}

/// Write a page file through a temp file and rename
fn write_record(path: &Path, record: &PageRecord) -> Result<(), String> {
    let mut json = serde_json::to_string_pretty(record).map_err(|e| e.to_string())?;
    json.push('\n');

    let tmp_path = tmp_write_path(path);
    let written = (|| -> Result<(), String> {
        let file = File::create(&tmp_path).map_err(|e| format!("{}: {e}", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(json.as_bytes())
            .map_err(|e| format!("{}: {e}", tmp_path.display()))?;
        writer
            .flush()
            .map_err(|e| format!("{}: {e}", tmp_path.display()))?;
        Ok(())
    })();

    if let Err(error) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        format!("{} -> {}: {e}", tmp_path.display(), path.display())
    })
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, PageRecord>,
    failing_writes: usize,
    writes: usize,
}

impl MemoryStore {
    pub fn new(records: impl IntoIterator<Item = PageRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.slug.clone(), r))
                .collect(),
            ..Self::default()
        }
    }

    /// Make the next `count` writes fail with a retryable error
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PageStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<PageRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn get_by_slug(&self, slug: &str) -> Result<PageRecord, StoreError> {
        self.records
            .get(slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                slug: slug.to_string(),
            })
    }

    fn upsert(&mut self, record: &PageRecord) -> Result<(), StoreError> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StoreError::Write {
                slug: record.slug.clone(),
                reason: "injected write failure".to_string(),
            });
        }
        self.records.insert(record.slug.clone(), record.clone());
        self.writes += 1;
        Ok(())
    }
}
