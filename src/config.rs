use crate::filter::{SlugFilter, SlugFilterConfig};
use crate::sync::SyncOptions;
use crate::validate::Rules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid slug pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("answer word range {min}-{max} is empty")]
    WordRange { min: usize, max: usize },
}

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityConfig {
    /// Directory holding one JSON record per page
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,

    /// Output of the static prerender step (`<slug>/index.html`)
    #[serde(default = "default_prerender_dir")]
    pub prerender_dir: PathBuf,

    /// Root of the running site for live rendered checks
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route prefix for content pages
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Per-page render budget
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// Pause after navigation before reading the page source
    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,

    #[serde(default = "default_answer_min_words")]
    pub answer_min_words: usize,

    #[serde(default = "default_answer_max_words")]
    pub answer_max_words: usize,

    /// Template minimum number of FAQs; unset means no minimum
    #[serde(default)]
    pub min_faqs: Option<usize>,

    #[serde(flatten)]
    pub filter: SlugFilterConfig,

    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: usize,

    #[serde(default = "default_retry_backoff_millis")]
    pub retry_backoff_millis: u64,
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("ssg-pages")
}

fn default_prerender_dir() -> PathBuf {
    PathBuf::from("prerendered")
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_route_prefix() -> String {
    "/content/".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_render_timeout_secs() -> u64 {
    30
}

fn default_settle_millis() -> u64 {
    500
}

fn default_answer_min_words() -> usize {
    20
}

fn default_answer_max_words() -> usize {
    50
}

fn default_max_write_attempts() -> usize {
    3
}

fn default_retry_backoff_millis() -> u64 {
    200
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            prerender_dir: default_prerender_dir(),
            base_url: default_base_url(),
            route_prefix: default_route_prefix(),
            webdriver_url: default_webdriver_url(),
            render_timeout_secs: default_render_timeout_secs(),
            settle_millis: default_settle_millis(),
            answer_min_words: default_answer_min_words(),
            answer_max_words: default_answer_max_words(),
            min_faqs: None,
            filter: SlugFilterConfig::default(),
            max_write_attempts: default_max_write_attempts(),
            retry_backoff_millis: default_retry_backoff_millis(),
        }
    }
}

impl ParityConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override settings from `PAGES_DIR`, `PRERENDER_DIR`, `WEBDRIVER_URL`
    /// and `PRERENDER_BASE_URL`
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with a custom variable lookup;
    /// empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = var("PAGES_DIR") {
            self.pages_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("PRERENDER_DIR") {
            self.prerender_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(url) = var("PRERENDER_BASE_URL") {
            self.base_url = url;
        }
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.answer_min_words > self.answer_max_words {
            return Err(ConfigError::WordRange {
                min: self.answer_min_words,
                max: self.answer_max_words,
            });
        }
        self.base_url()?;
        self.slug_filter()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    pub fn rules(&self) -> Rules {
        Rules {
            answer_words: self.answer_min_words..=self.answer_max_words,
            min_faqs: self.min_faqs,
        }
    }

    pub fn sync_options(&self, dry_run: bool) -> SyncOptions {
        SyncOptions {
            dry_run,
            max_write_attempts: self.max_write_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_millis),
        }
    }

    pub fn slug_filter(&self) -> Result<SlugFilter, ConfigError> {
        Ok(SlugFilter::new(&self.filter)?)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}
