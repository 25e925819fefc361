//! Product records and the per-card fields they are built from.

use serde::{Deserialize, Serialize};

use super::IdentityKey;

/// Fields extracted once from a single product card.
///
/// Shared by every colour variant of that card; only `colours` fans out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Colour identifiers in document order, repeats kept
    pub colours: Vec<String>,

    /// Product name, whitespace-normalized
    pub title: String,

    /// Display capacity with whitespace removed (e.g. "128GB")
    pub capacity_label: String,

    /// Capacity in megabytes
    pub capacity_mb: u64,

    /// Price digits and decimal point only
    pub price: String,

    /// Image URL with `..` resolved against the site base URL
    pub image_url: String,

    /// "In Stock", "Out of Stock", a raw status, or empty
    pub availability_text: String,

    /// False only when `availability_text` is exactly "Out of Stock"
    pub is_available: bool,

    /// Second status block text, or empty
    pub shipping_text: String,

    /// `YYYY-MM-DD`, or empty
    pub shipping_date: String,
}

impl ExtractedFields {
    /// Title as it appears on records: `"{title} {capacity}"`.
    pub fn display_title(&self) -> String {
        format!("{} {}", self.title, self.capacity_label)
    }

    /// Identity key for one colour of this card.
    pub fn identity_key(&self, colour: &str) -> IdentityKey {
        IdentityKey::generate(colour, &self.title, &self.capacity_label)
    }

    /// Build the record for one colour of this card.
    pub fn to_record(&self, colour: &str) -> ProductRecord {
        ProductRecord {
            title: self.display_title(),
            price: self.price.clone(),
            image_url: self.image_url.clone(),
            capacity_mb: self.capacity_mb,
            colour: colour.to_string(),
            availability_text: self.availability_text.clone(),
            is_available: self.is_available,
            shipping_text: self.shipping_text.clone(),
            shipping_date: self.shipping_date.clone(),
        }
    }
}

/// One catalog entry: a single colour variant of a product.
///
/// Field order and names match the output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,

    pub price: String,

    #[serde(rename = "imageUrl")]
    pub image_url: String,

    #[serde(rename = "capacityMB")]
    pub capacity_mb: u64,

    pub colour: String,

    #[serde(rename = "availabilityText")]
    pub availability_text: String,

    #[serde(rename = "isAvailable")]
    pub is_available: bool,

    #[serde(rename = "shippingText")]
    pub shipping_text: String,

    #[serde(rename = "shippingDate")]
    pub shipping_date: String,
}
