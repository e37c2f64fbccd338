//! Harvard Art Museums object API client.
//!
//! Async HTTP client using `reqwest`, with the retry policy from
//! [`RetryPolicy`] applied to rate limits and transport failures.

use std::time::Duration;

use humantime::format_duration;
use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::Catalog;
use super::types::{Feed, Page};
use crate::config::{CatalogConfig, RetryPolicy};
use crate::error::FetchError;

/// Client for the `/object` listing of the museum catalog.
#[derive(Debug, Clone)]
pub struct HarvardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    fields: String,
    search_page_size: u32,
    retry: RetryPolicy,
}

impl HarvardClient {
    /// Builds a client from validated catalog settings.
    pub fn new(cfg: &CatalogConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gallery-frame/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            fields: cfg.fields.join(","),
            search_page_size: cfg.search_page_size,
            retry: cfg.retry.clone(),
        })
    }

    /// GET `/object` with the retry policy applied.
    async fn get(&self, params: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}/object", self.base_url);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match self.send_once(&url, params).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(err),
            };

            if attempt >= max_attempts {
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.retry_delay(&err, attempt);
            warn!(
                attempt,
                max_attempts,
                delay = %format_duration(delay),
                error = %err,
                "catalog request failed; retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;
        Ok(body.to_vec())
    }

    fn retry_delay(&self, err: &FetchError, attempt: u32) -> Duration {
        match err {
            FetchError::RateLimited => self.retry.rate_limit_backoff * attempt,
            _ => self.retry.network_retry_delay,
        }
    }

    fn base_params(&self, page: u32, size: u32) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("hasimage", "1".into()),
        ]
    }

    async fn fetch(&self, params: Vec<(&str, String)>, feed: Feed) -> Result<Page, FetchError> {
        let body = self.get(&params).await?;
        let page: Page = serde_json::from_slice(&body)?;
        let received = page.records.len();
        let page = page.filtered(feed);
        debug!(
            ?feed,
            page = page.info.page,
            received,
            kept = page.records.len(),
            "catalog page fetched"
        );
        Ok(page)
    }
}

impl Catalog for HarvardClient {
    async fn fetch_page(&self, page: u32, size: u32) -> Result<Page, FetchError> {
        let mut params = self.base_params(page, size);
        params.push(("sort", "random".into()));
        params.push(("fields", self.fields.clone()));
        self.fetch(params, Feed::Random).await
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Page, FetchError> {
        let mut params = self.base_params(page, self.search_page_size);
        params.push(("q", query.to_string()));
        params.push(("fields", self.fields.clone()));
        self.fetch(params, Feed::Search).await
    }
}
