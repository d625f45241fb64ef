//! Turning command-line inputs into page records.

use crate::filter::SlugFilter;
use crate::page::PageRecord;
use crate::store::{DirectoryStore, PageStore, StoreError, read_record};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Looked like a path but nothing exists there
    #[error("no such file or directory: {0}")]
    NoSuchPath(String),
}

/// One input record, read or not
#[derive(Debug)]
pub struct LoadedPage {
    /// File path or slug the record was requested by
    pub origin: String,
    pub record: Result<PageRecord, LoadError>,
}

/// Resolve inputs into records
///
/// Each input is a directory (every `*.json` in it, sorted), a record file,
/// or a slug looked up in the store. No inputs means the whole store
/// directory. A record that cannot be read becomes a failed entry; a
/// directory that cannot be listed aborts the batch.
pub fn collect_pages(
    inputs: &[String],
    store: &DirectoryStore,
    filter: &SlugFilter,
) -> Result<Vec<LoadedPage>, StoreError> {
    let mut pages = Vec::new();

    if inputs.is_empty() {
        collect_directory(store.root(), filter, &mut pages)?;
        return Ok(pages);
    }

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            collect_directory(path, filter, &mut pages)?;
        } else if path.is_file() {
            push_admitted(
                input.clone(),
                read_record(path).map_err(LoadError::from),
                filter,
                &mut pages,
            );
        } else if looks_like_path(input) {
            pages.push(LoadedPage {
                origin: input.clone(),
                record: Err(LoadError::NoSuchPath(input.clone())),
            });
        } else {
            push_admitted(
                input.clone(),
                store.get_by_slug(input).map_err(LoadError::from),
                filter,
                &mut pages,
            );
        }
    }

    ::log::debug!("Collected {} page(s) from {} input(s)", pages.len(), inputs.len());
    Ok(pages)
}

fn collect_directory(
    dir: &Path,
    filter: &SlugFilter,
    pages: &mut Vec<LoadedPage>,
) -> Result<(), StoreError> {
    for path in DirectoryStore::new(dir).record_paths()? {
        let origin = path.display().to_string();
        let record = read_record(&path).map_err(LoadError::from);
        push_admitted(origin, record, filter, pages);
    }
    Ok(())
}

fn push_admitted(
    origin: String,
    record: Result<PageRecord, LoadError>,
    filter: &SlugFilter,
    pages: &mut Vec<LoadedPage>,
) {
    if let Ok(record) = &record {
        if !filter.admits(&record.slug) {
            return;
        }
    }
    pages.push(LoadedPage { origin, record });
}

fn looks_like_path(input: &str) -> bool {
    input.contains(['/', '\\']) || input.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SlugFilterConfig;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"slug":"beta","faqs":[{"q":"Q?","a":"A."}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("a.json"), r#"{"slug":"alpha","faqs":[]}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn test_no_inputs_reads_whole_store() {
        let dir = fixture();
        let store = DirectoryStore::new(dir.path());
        let pages = collect_pages(&[], &store, &SlugFilter::default()).unwrap();

        let slugs = pages
            .iter()
            .map(|p| p.record.as_ref().map(|r| r.slug.clone()).ok())
            .collect::<Vec<_>>();
        assert_eq!(
            slugs,
            vec![Some("alpha".to_string()), Some("beta".to_string()), None]
        );
        assert!(pages[2].origin.ends_with("broken.json"));
    }

    #[test]
    fn test_slug_file_and_missing_inputs() {
        let dir = fixture();
        let store = DirectoryStore::new(dir.path());
        let file = dir.path().join("b.json").display().to_string();
        let inputs = vec![
            "alpha".to_string(),
            file,
            "ghost".to_string(),
            "missing/page.json".to_string(),
        ];

        let pages = collect_pages(&inputs, &store, &SlugFilter::default()).unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].record.as_ref().unwrap().slug, "alpha");
        assert_eq!(pages[1].record.as_ref().unwrap().slug, "beta");
        assert!(matches!(
            pages[2].record,
            Err(LoadError::Store(StoreError::NotFound { .. }))
        ));
        assert!(matches!(pages[3].record, Err(LoadError::NoSuchPath(_))));
    }

    #[test]
    fn test_filter_drops_excluded_slugs() {
        let dir = fixture();
        fs::remove_file(dir.path().join("broken.json")).unwrap();
        let store = DirectoryStore::new(dir.path());
        let filter = SlugFilter::new(&SlugFilterConfig {
            include_patterns: Vec::new(),
            exclude_patterns: vec!["^alpha$".to_string()],
        })
        .unwrap();

        let pages = collect_pages(&[], &store, &filter).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].record.as_ref().unwrap().slug, "beta");
    }

    #[test]
    fn test_unlistable_directory_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("absent"));
        assert!(matches!(
            collect_pages(&[], &store, &SlugFilter::default()),
            Err(StoreError::Unavailable(_))
        ));
    }
}
