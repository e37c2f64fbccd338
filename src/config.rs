use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.harvardartmuseums.org";

const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "title",
    "dated",
    "url",
    "primaryimageurl",
    "images",
    "people",
    "culture",
    "medium",
    "dimensions",
    "creditline",
    "classification",
    "department",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Remote catalog endpoint and credentials.
    pub catalog: CatalogConfig,
    /// Paging and timing of the slideshow itself.
    pub slideshow: SlideshowOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.catalog
            .validate()
            .context("invalid catalog configuration")?;
        self.slideshow
            .validate()
            .context("invalid slideshow configuration")?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Endpoint root; `/object` is appended per request.
    pub base_url: String,
    /// Catalog API key. Supplied by config or `--api-key`, never built in.
    pub api_key: String,
    /// Record fields requested from the catalog.
    pub fields: Vec<String>,
    /// Page size used by free-text search.
    pub search_page_size: u32,
    /// How transient failures are retried.
    pub retry: RetryPolicy,
}

impl CatalogConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.base_url.trim().is_empty(),
            "catalog.base-url must not be empty"
        );
        ensure!(
            self.base_url.starts_with("https://") || self.base_url.starts_with("http://"),
            "catalog.base-url must be an http(s) URL"
        );
        ensure!(
            !self.api_key.trim().is_empty(),
            "catalog.api-key must be set (config file or --api-key)"
        );
        ensure!(!self.fields.is_empty(), "catalog.fields must not be empty");
        ensure!(
            self.search_page_size > 0,
            "catalog.search-page-size must be greater than zero"
        );
        self.retry.validate()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            search_page_size: 20,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts per request, the first one included.
    pub max_attempts: u32,
    /// Base wait after a 429; multiplied by the attempt number.
    #[serde(with = "humantime_serde")]
    pub rate_limit_backoff: Duration,
    /// Fixed wait after a transport failure.
    #[serde(with = "humantime_serde")]
    pub network_retry_delay: Duration,
}

impl RetryPolicy {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_attempts >= 1,
            "catalog.retry.max-attempts must be >= 1"
        );
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: Duration::from_secs(1),
            network_retry_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SlideshowOptions {
    /// Records requested by the initial load.
    pub initial_page_size: u32,
    /// Records requested by each background growth; also the page stride.
    pub growth_page_size: u32,
    /// Growth is requested once the position is this close to the end.
    pub trailing_window: usize,
    /// Auto-play period.
    #[serde(with = "humantime_serde")]
    pub advance_interval: Duration,
    /// How long the info overlay stays up before hiding itself.
    #[serde(with = "humantime_serde")]
    pub info_hide_delay: Duration,
}

impl SlideshowOptions {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.initial_page_size > 0,
            "slideshow.initial-page-size must be greater than zero"
        );
        ensure!(
            self.growth_page_size > 0,
            "slideshow.growth-page-size must be greater than zero"
        );
        ensure!(
            self.trailing_window >= 1,
            "slideshow.trailing-window must be >= 1"
        );
        ensure!(
            !self.advance_interval.is_zero(),
            "slideshow.advance-interval must be positive"
        );
        ensure!(
            !self.info_hide_delay.is_zero(),
            "slideshow.info-hide-delay must be positive"
        );
        Ok(())
    }
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            initial_page_size: 50,
            growth_page_size: 20,
            trailing_window: 10,
            advance_interval: Duration::from_secs(50),
            info_hide_delay: Duration::from_secs(8),
        }
    }
}
