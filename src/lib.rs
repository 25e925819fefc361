//! # Storefront Catalog
//!
//! Scrapes a paginated storefront listing into a deduplicated product catalog.
//!
//! ## Architecture
//!
//! - **extract**: Per-field extraction from a single product card
//! - **catalog**: Colour variant expansion and cross-page deduplication
//! - **scrape**: Pagination and run orchestration
//! - **fetch**: Page retrieval with local caching
//! - **storage**: JSON / JSON Lines output
//! - **models**: Core data structures (records, identity keys, counters)
//! - **config**: Configuration loading and validation

pub mod catalog;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod scrape;
pub mod storage;

pub use models::*;

use scraper::Html;

use crate::catalog::Catalog;
use crate::scrape::page_count;

/// Parse one listing page without any network access.
///
/// Returns the catalog built from that page alone and the page count shown
/// in its pagination control.
pub fn parse_listing(html: &str, site_url: &str) -> (Catalog, u32) {
    let document = Html::parse_document(html);
    let mut catalog = Catalog::new(site_url);
    catalog.process_page(1, &document);
    (catalog, page_count(&document))
}
