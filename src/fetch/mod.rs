//! Listing page retrieval.
//!
//! [`PageSource`] is the boundary between the scraper and the network: it
//! turns a URL into an HTML body or fails. [`Fetcher`] is the HTTP
//! implementation and keeps a local copy of every page it downloads so
//! repeated runs inside the cache TTL stay offline. [`MockPageSource`]
//! serves fixed bodies for tests and fixture runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status} for {url}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something that can return the HTML body of a listing page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the body at `url`. Any failure is fatal to the run.
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;
}

/// Metadata stored alongside a cached page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Directory for cached pages
    pub cache_dir: PathBuf,

    /// How long a cached page is reused; zero always refetches
    pub cache_ttl: Duration,

    /// Maximum body size to accept (default 50MB)
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Minimum gap between network requests
    pub request_delay: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/raw"),
            cache_ttl: Duration::from_secs(3600), // 1 hour
            max_content_size: 50 * 1024 * 1024,   // 50MB
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            request_delay: Duration::ZERO,
        }
    }
}

/// HTTP fetcher with a local page cache.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
    last_request: Mutex<Option<Instant>>,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("storefront-catalog/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Return a cached page if one is still fresh.
    async fn read_cache(&self, url: &Url) -> Result<Option<String>, FetchError> {
        if self.config.cache_ttl.is_zero() {
            return Ok(None);
        }

        let page_path = self.page_path_for_url(url);
        let meta_path = self.meta_path_for_url(url);
        if !page_path.exists() || !meta_path.exists() {
            return Ok(None);
        }

        let meta_content = fs::read_to_string(&meta_path).await?;
        let meta: CacheMetadata = match serde_json::from_str(&meta_content) {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };

        if !Self::is_fresh(&meta, self.config.cache_ttl, Utc::now()) {
            debug!("Cache expired for {}", url);
            return Ok(None);
        }

        info!("Serving {} from cache", url);
        Ok(Some(fs::read_to_string(&page_path).await?))
    }

    /// Check whether cached metadata is inside the TTL at `now`.
    fn is_fresh(meta: &CacheMetadata, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(meta.fetched_at);
        age.num_seconds() <= ttl.as_secs() as i64
    }

    /// Sleep until `request_delay` has passed since the previous request.
    async fn throttle(&self) {
        if self.config.request_delay.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.request_delay {
                tokio::time::sleep(self.config.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Download a page and store it in the cache.
    async fn download(&self, url: &Url) -> Result<String, FetchError> {
        self.throttle().await;
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        let body = String::from_utf8_lossy(&content).into_owned();
        self.write_cache(url, &body, content_type).await?;

        Ok(body)
    }

    /// Write a page body and its metadata to the cache directory.
    async fn write_cache(
        &self,
        url: &Url,
        body: &str,
        content_type: Option<String>,
    ) -> Result<(), FetchError> {
        let page_path = self.page_path_for_url(url);
        let meta_path = self.meta_path_for_url(url);

        if let Some(parent) = page_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&page_path).await?;
        file.write_all(body.as_bytes()).await?;
        file.flush().await?;

        let fetched_at = Utc::now();
        let meta = CacheMetadata {
            url: url.to_string(),
            fetched_at,
            content_type,
            content_length: body.len(),
            expires_at: Some(
                fetched_at + chrono::Duration::seconds(self.config.cache_ttl.as_secs() as i64),
            ),
        };

        let meta_json = serde_json::to_string_pretty(&meta)?;
        fs::write(&meta_path, meta_json).await?;

        debug!("Cached {} at {:?}", url, page_path);
        Ok(())
    }

    /// Cache path for a page body.
    fn page_path_for_url(&self, url: &Url) -> PathBuf {
        self.cache_file(url, "html")
    }

    /// Cache path for page metadata.
    fn meta_path_for_url(&self, url: &Url) -> PathBuf {
        self.cache_file(url, "meta.json")
    }

    fn cache_file(&self, url: &Url, extension: &str) -> PathBuf {
        let host = url.host_str().unwrap_or("unknown");
        self.config
            .cache_dir
            .join(host)
            .join(format!("{}.{}", Self::url_hash(url), extension))
    }

    /// Hash a URL to a short string. Query strings are part of the hash so
    /// each listing page gets its own entry.
    fn url_hash(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }

    /// Directory pages are cached in.
    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(body) = self.read_cache(url).await? {
            return Ok(body);
        }
        self.download(url).await
    }
}

/// In-memory page source keyed by full URL.
#[derive(Debug, Clone, Default)]
pub struct MockPageSource {
    pages: HashMap<String, String>,
    requests: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}
