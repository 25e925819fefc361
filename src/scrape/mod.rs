//! Scrape orchestrator.
//!
//! Drives one full run over a paginated listing:
//! 1. Fetch page 1 and read the page count from its pagination control
//! 2. Feed page 1 to the catalog
//! 3. Fetch and feed pages 2..=N in order
//! 4. Return the catalog records and run counters
//!
//! Pages are handled strictly one after another. The first fetch failure
//! aborts the run and no partial catalog is returned.

pub mod pagination;

use std::sync::Arc;
use std::time::{Duration, Instant};

use scraper::Html;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use url::Url;

use crate::catalog::Catalog;
use crate::fetch::{FetchError, PageSource};
use crate::models::{CatalogStats, PageSummary, ProductRecord};

pub use pagination::{listing_url, page_count, page_url};

/// Errors that abort a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Error scraping products: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error scraping products: invalid listing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Where to scrape from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Site root; also used to resolve relative image paths
    pub site_url: Url,

    /// Category path appended to the site root
    pub category: String,
}

impl ScrapeConfig {
    pub fn new(site_url: Url, category: impl Into<String>) -> Self {
        Self {
            site_url,
            category: category.into(),
        }
    }

    /// URL of the first listing page.
    pub fn listing_url(&self) -> Result<Url, ScrapeError> {
        Ok(listing_url(&self.site_url, &self.category)?)
    }
}

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "phase", content = "page", rename_all = "snake_case")]
pub enum ScrapePhase {
    #[default]
    NotStarted,
    FetchingPage(u32),
    Processing(u32),
    Done,
}

impl ScrapePhase {
    /// Phase that follows processing `page` when the listing ends at
    /// `last_page`. A `last_page` of 0 means the listing has one page.
    pub fn after_processing(page: u32, last_page: u32) -> Self {
        if page < last_page {
            ScrapePhase::FetchingPage(page + 1)
        } else {
            ScrapePhase::Done
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    /// Deduplicated records in first-seen order
    pub records: Vec<ProductRecord>,

    pub stats: CatalogStats,

    /// One entry per processed page, in order
    pub pages: Vec<PageSummary>,

    pub duration: Duration,
}

/// Runs a scrape over a [`PageSource`].
pub struct ScrapeOrchestrator {
    config: ScrapeConfig,
    source: Arc<dyn PageSource>,
    phase: Arc<RwLock<ScrapePhase>>,
}

impl ScrapeOrchestrator {
    /// Create a new scrape orchestrator.
    pub fn new(config: ScrapeConfig, source: Arc<dyn PageSource>) -> Self {
        Self {
            config,
            source,
            phase: Arc::new(RwLock::new(ScrapePhase::NotStarted)),
        }
    }

    /// Current phase of the run.
    pub async fn phase(&self) -> ScrapePhase {
        *self.phase.read().await
    }

    async fn transition(&self, next: ScrapePhase) {
        let mut phase = self.phase.write().await;
        debug!("Scrape phase {:?} -> {:?}", *phase, next);
        *phase = next;
    }

    /// Scrape every listing page and return the catalog.
    pub async fn run(&self) -> Result<ScrapeResult, ScrapeError> {
        let result = self.run_pages().await;
        if let Err(e) = &result {
            error!("Scrape failed: {}", e);
        }
        result
    }

    async fn run_pages(&self) -> Result<ScrapeResult, ScrapeError> {
        let start = Instant::now();
        let listing = self.config.listing_url()?;
        info!("Starting scrape of {}", listing);

        let mut catalog = Catalog::new(self.config.site_url.as_str());
        let mut pages = Vec::new();
        let mut page = 1;
        let mut last_page = 0;

        loop {
            self.transition(ScrapePhase::FetchingPage(page)).await;
            let url = if page == 1 {
                listing.clone()
            } else {
                page_url(&listing, page)
            };
            let body = self.source.fetch_page(&url).await?;

            self.transition(ScrapePhase::Processing(page)).await;
            let summary = {
                let document = Html::parse_document(&body);
                if page == 1 {
                    last_page = page_count(&document);
                    debug!("Listing reports {} pages", last_page);
                }
                catalog.process_page(page, &document)
            };

            info!(
                page = summary.page,
                products = summary.new_products,
                "Page: {}, Product Scraped: {}",
                summary.page,
                summary.new_products
            );
            pages.push(summary);

            match ScrapePhase::after_processing(page, last_page) {
                ScrapePhase::FetchingPage(next) => page = next,
                _ => break,
            }
        }

        self.transition(ScrapePhase::Done).await;

        let stats = catalog.stats();
        let duration = start.elapsed();
        info!(
            "Scrape completed: {} variants found, {} duplicates, {} products in {:?}",
            stats.total_variants_seen, stats.duplicates_found, stats.unique_products, duration
        );

        Ok(ScrapeResult {
            records: catalog.into_records(),
            stats,
            pages,
            duration,
        })
    }
}
