//! CSS selectors and patterns for the storefront listing markup.
//!
//! Update this file when the storefront changes its HTML structure.

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Product card container on a listing page.
pub static PRODUCT_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product").expect("valid selector"));

/// Product name.
pub static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-name").expect("valid selector"));

/// Price text, including currency symbol.
pub static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".text-lg").expect("valid selector"));

/// Product image.
pub static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));

/// Capacity label (e.g. "128 GB").
pub static CAPACITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-capacity").expect("valid selector"));

/// Elements declaring a colour variant.
pub static COLOUR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-colour]").expect("valid selector"));

/// Attribute carrying the colour identifier.
pub const COLOUR_ATTR: &str = "data-colour";

/// Small-print status block; the first one holds availability.
pub static STATUS_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".my-4.text-sm.block.text-center").expect("valid selector")
});

/// Status blocks rendered as `div`; the second one holds shipping.
pub static SHIPPING_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.my-4.text-sm.block.text-center").expect("valid selector")
});

/// Last link of the pagination control.
pub static LAST_PAGE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#pages a:last-child").expect("valid selector"));

/// Everything that is not a digit or decimal point.
pub static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.]").expect("valid regex"));

/// Gigabyte capacity, e.g. "256 GB" or "64gb".
pub static CAPACITY_GB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s?GB").expect("valid regex"));

/// Availability label and the status following it.
pub static AVAILABILITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Availability:\s*(.+)").expect("valid regex"));

/// Written date, e.g. "23rd Jan 2025" or "1 March 2025".
///
/// The middle word must be a month name or abbreviation.
pub static WRITTEN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\b\s+(\d{4})\b",
    )
    .expect("valid regex")
});

/// ISO calendar date, e.g. "2025-01-23".
pub static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));
