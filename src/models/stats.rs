//! Run counters for a catalog scrape.

/// Aggregate counters for a whole run.
///
/// `total_variants_seen == unique_products + duplicates_found` holds at every
/// point of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// One per (card x colour) encountered, duplicates included
    pub total_variants_seen: u64,

    /// Times an identity key was seen again
    pub duplicates_found: u64,

    /// Records kept in the catalog
    pub unique_products: u64,
}

impl CatalogStats {
    /// Check the counting invariant.
    pub fn is_consistent(&self) -> bool {
        self.total_variants_seen == self.unique_products + self.duplicates_found
    }
}

/// What a single page contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// 1-based page number
    pub page: u32,

    /// Product cards found on the page
    pub cards: usize,

    /// New unique records added by this page
    pub new_products: u64,
}
