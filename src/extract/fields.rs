//! Per-field extractors and the text parsers behind them.
//!
//! Extractors take a [`ProductNode`] and return one normalized field.
//! The `parse_*` functions work on plain text so the format branches can be
//! exercised without markup.

use chrono::NaiveDate;
use tracing::trace;

use super::selectors::{
    AVAILABILITY, CAPACITY, CAPACITY_GB, COLOUR, COLOUR_ATTR, IMAGE, ISO_DATE, NAME, NON_NUMERIC,
    PRICE, SHIPPING_BLOCK, STATUS_BLOCK, WRITTEN_DATE,
};
use super::{element_text, ProductNode};

pub const IN_STOCK: &str = "In Stock";
pub const OUT_OF_STOCK: &str = "Out of Stock";

const MB_PER_GB: u64 = 1024;

/// Product name.
pub fn title(node: &ProductNode<'_>) -> String {
    node.text_of(&NAME).unwrap_or_default()
}

/// Price with currency symbols and separators stripped.
pub fn price(node: &ProductNode<'_>) -> String {
    node.text_of(&PRICE)
        .map(|text| strip_non_numeric(&text))
        .unwrap_or_default()
}

/// Image `src` with every `..` replaced by the site URL.
pub fn image_url(node: &ProductNode<'_>, site_url: &str) -> String {
    node.attr_of(&IMAGE, "src")
        .map(|src| src.replace("..", site_url))
        .unwrap_or_default()
}

/// Capacity label with all whitespace removed ("128 GB" -> "128GB").
pub fn capacity_label(node: &ProductNode<'_>) -> String {
    node.text_of(&CAPACITY)
        .map(|text| text.chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

/// Capacity in megabytes.
pub fn capacity_mb(node: &ProductNode<'_>) -> u64 {
    node.text_of(&CAPACITY)
        .map(|text| parse_capacity_mb(&text))
        .unwrap_or(0)
}

/// Colour identifiers in document order. Repeats are kept.
pub fn colours(node: &ProductNode<'_>) -> Vec<String> {
    node.all(&COLOUR)
        .into_iter()
        .filter_map(|el| el.value().attr(COLOUR_ATTR))
        .map(str::to_string)
        .collect()
}

/// Availability status from the first status block.
pub fn availability_text(node: &ProductNode<'_>) -> String {
    node.text_of(&STATUS_BLOCK)
        .map(|text| parse_availability(&text))
        .unwrap_or_default()
}

/// Whether a product with this availability text can be bought.
///
/// Unknown or missing availability counts as available.
pub fn is_available(availability_text: &str) -> bool {
    availability_text != OUT_OF_STOCK
}

/// Text of the second status block, only when there are exactly two.
pub fn shipping_text(node: &ProductNode<'_>) -> String {
    let blocks = node.all(&SHIPPING_BLOCK);
    if blocks.len() != 2 {
        return String::new();
    }
    element_text(blocks[1])
}

/// Shipping date of a card as `YYYY-MM-DD`, or empty.
pub fn shipping_date(node: &ProductNode<'_>) -> String {
    parse_shipping_date(&shipping_text(node))
}

/// Keep only digits and decimal points.
pub fn strip_non_numeric(text: &str) -> String {
    NON_NUMERIC.replace_all(text, "").into_owned()
}

/// Convert capacity text to megabytes.
///
/// "<n> GB" (case-insensitive, at most one space) is `n * 1024`. Anything
/// else falls back to the text's digits taken as-is; a decimal fallback is
/// truncated and an empty one is 0.
pub fn parse_capacity_mb(text: &str) -> u64 {
    if let Some(caps) = CAPACITY_GB.captures(text) {
        if let Some(mb) = caps[1]
            .parse::<u64>()
            .ok()
            .and_then(|gb| gb.checked_mul(MB_PER_GB))
        {
            return mb;
        }
    }

    let fallback = strip_non_numeric(text);
    let whole = fallback.split('.').next().unwrap_or_default();
    match whole.parse::<u64>() {
        Ok(mb) => mb,
        Err(_) => {
            trace!("Capacity {:?} has no usable number", text);
            0
        }
    }
}

/// Normalize the status after an "Availability:" label.
///
/// Statuses mentioning "In Stock" or "Out of Stock" collapse to exactly that
/// phrase; other statuses are returned trimmed. No label gives "".
pub fn parse_availability(text: &str) -> String {
    let Some(caps) = AVAILABILITY.captures(text) else {
        return String::new();
    };

    let status = caps[1].trim();
    if status.contains(IN_STOCK) {
        IN_STOCK.to_string()
    } else if status.contains(OUT_OF_STOCK) {
        OUT_OF_STOCK.to_string()
    } else {
        status.to_string()
    }
}

/// Find a shipping date in free text and format it as `YYYY-MM-DD`.
///
/// A written date ("23rd Jan 2025") wins over an ISO date already in the
/// text. A written date that is not a real calendar date gives "".
pub fn parse_shipping_date(text: &str) -> String {
    if let Some(caps) = WRITTEN_DATE.captures(text) {
        // chrono accepts "Sep" and "September" but not "Sept"
        let month = if caps[2].eq_ignore_ascii_case("sept") {
            "Sep"
        } else {
            &caps[2]
        };
        let candidate = format!("{} {} {}", &caps[1], month, &caps[3]);
        return match NaiveDate::parse_from_str(&candidate, "%d %B %Y") {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(e) => {
                trace!("Unparseable shipping date {:?}: {}", candidate, e);
                String::new()
            }
        };
    }

    ISO_DATE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
