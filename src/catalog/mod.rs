//! Catalog aggregation across listing pages.
//!
//! A [`Catalog`] owns all state for one run: the ordered records, the set of
//! identity keys already emitted, and the run counters. Pages are fed in one
//! at a time; records are appended in first-seen order and never re-sorted.

pub mod expand;

use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, trace};

use crate::extract::selectors::PRODUCT_CARD;
use crate::extract::ProductNode;
use crate::models::{CatalogStats, IdentityKey, PageSummary, ProductRecord};

pub use expand::expand;

/// Deduplicated product catalog and its run counters.
#[derive(Debug, Clone)]
pub struct Catalog {
    site_url: String,
    records: Vec<ProductRecord>,
    seen_keys: HashSet<IdentityKey>,
    total_variants_seen: u64,
    duplicates_found: u64,
    per_page_count: u64,
}

impl Catalog {
    /// Create an empty catalog. `site_url` resolves relative image paths.
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            records: Vec::new(),
            seen_keys: HashSet::new(),
            total_variants_seen: 0,
            duplicates_found: 0,
            per_page_count: 0,
        }
    }

    /// Process every product card on one listing page.
    pub fn process_page(&mut self, page: u32, document: &Html) -> PageSummary {
        self.per_page_count = 0;
        let mut cards = 0;

        for element in document.select(&PRODUCT_CARD) {
            cards += 1;
            let node = ProductNode::new(element);
            for (key, record) in expand(&node, &self.site_url) {
                self.insert(key, record);
            }
        }

        debug!(
            "Page {}: {} cards, {} new products",
            page, cards, self.per_page_count
        );

        PageSummary {
            page,
            cards,
            new_products: self.per_page_count,
        }
    }

    /// Record one variant. Returns true if it was new.
    pub fn insert(&mut self, key: IdentityKey, record: ProductRecord) -> bool {
        self.total_variants_seen += 1;

        if self.seen_keys.contains(&key) {
            trace!("Duplicate product {}", key);
            self.duplicates_found += 1;
            return false;
        }

        self.seen_keys.insert(key);
        self.records.push(record);
        self.per_page_count += 1;
        true
    }

    /// Unique records added since the current page started.
    pub fn per_page_count(&self) -> u64 {
        self.per_page_count
    }

    /// Records in first-seen order.
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a key has already been emitted.
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.seen_keys.contains(key)
    }

    /// Current run counters.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_variants_seen: self.total_variants_seen,
            duplicates_found: self.duplicates_found,
            unique_products: self.records.len() as u64,
        }
    }

    /// Consume the catalog, returning its records.
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}
