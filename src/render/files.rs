use super::{RenderError, Renderer};
use crate::utils::slug_for_route;
use std::path::{Path, PathBuf};

/// Reads the output of a static prerender step: `<root>/<slug>/index.html`
#[derive(Debug, Clone)]
pub struct PrerenderedDirectory {
    root: PathBuf,
    route_prefix: String,
}

impl PrerenderedDirectory {
    pub fn new(root: impl Into<PathBuf>, route_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            route_prefix: route_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the prerendered HTML for a slug
    pub fn path_for_slug(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join("index.html")
    }

    pub fn path_for_route(&self, route: &str) -> PathBuf {
        self.path_for_slug(&slug_for_route(route, &self.route_prefix))
    }
}

impl Renderer for PrerenderedDirectory {
    async fn render(&mut self, route: &str) -> Result<String, RenderError> {
        let path = self.path_for_route(route);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::Missing { path })
            }
            Err(source) => Err(RenderError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_reads_index_and_nested_pages() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("index")).unwrap();
        fs::create_dir_all(dir.path().join("calgary")).unwrap();
        fs::write(dir.path().join("index/index.html"), "<p>home</p>").unwrap();
        fs::write(dir.path().join("calgary/index.html"), "<p>calgary</p>").unwrap();

        let mut renderer = PrerenderedDirectory::new(dir.path(), "/content/");
        assert_eq!(renderer.render("/").await.unwrap(), "<p>home</p>");
        assert_eq!(
            renderer.render("/content/calgary").await.unwrap(),
            "<p>calgary</p>"
        );
    }

    #[tokio::test]
    async fn test_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = PrerenderedDirectory::new(dir.path(), "/content/");

        match renderer.render("/content/nowhere").await {
            Err(RenderError::Missing { path }) => {
                assert!(path.ends_with("nowhere/index.html"));
            }
            other => panic!("expected a missing page, got {other:?}"),
        }
    }
}
