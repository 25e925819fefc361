//! Field extraction from product cards.
//!
//! Each product card on a listing page is read through a [`ProductNode`],
//! a read-only handle exposing the four queries extraction needs:
//! first match, all matches, attribute and text. Field functions in
//! [`fields`] are pure and never fail; a missing element yields an empty
//! or default value instead.

pub mod fields;
pub mod selectors;

use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::models::ExtractedFields;

/// Read-only view of one product card.
#[derive(Debug, Clone, Copy)]
pub struct ProductNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> ProductNode<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// First descendant matching `selector`.
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.element.select(selector).next()
    }

    /// All descendants matching `selector`, in document order.
    pub fn all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.element.select(selector).collect()
    }

    /// Normalized text of the first match.
    pub fn text_of(&self, selector: &Selector) -> Option<String> {
        self.first(selector).map(element_text)
    }

    /// Attribute value of the first match.
    pub fn attr_of(&self, selector: &Selector, name: &str) -> Option<&'a str> {
        self.first(selector).and_then(|el| el.value().attr(name))
    }
}

/// Text content of an element with whitespace runs collapsed and trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run every field extractor once over a card.
///
/// `site_url` is used to resolve relative image paths.
pub fn extract_fields(node: &ProductNode<'_>, site_url: &str) -> ExtractedFields {
    let availability_text = fields::availability_text(node);
    let shipping_text = fields::shipping_text(node);

    let extracted = ExtractedFields {
        colours: fields::colours(node),
        title: fields::title(node),
        capacity_label: fields::capacity_label(node),
        capacity_mb: fields::capacity_mb(node),
        price: fields::price(node),
        image_url: fields::image_url(node, site_url),
        is_available: fields::is_available(&availability_text),
        availability_text,
        shipping_date: fields::parse_shipping_date(&shipping_text),
        shipping_text,
    };

    if extracted.title.is_empty() || extracted.price.is_empty() {
        debug!(
            "Incomplete product card: title={:?} price={:?}",
            extracted.title, extracted.price
        );
    }

    extracted
}
