//! Fan a product card out into one record per colour variant.

use crate::extract::{extract_fields, ProductNode};
use crate::models::{IdentityKey, ProductRecord};

/// Expand a card into `(identity key, record)` pairs, one per colour.
///
/// Fields are extracted once and shared by every variant. Colours are
/// visited in document order, repeats included. A card without colours
/// yields nothing.
pub fn expand(node: &ProductNode<'_>, site_url: &str) -> Vec<(IdentityKey, ProductRecord)> {
    let fields = extract_fields(node, site_url);

    fields
        .colours
        .iter()
        .map(|colour| (fields.identity_key(colour), fields.to_record(colour)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::selectors::PRODUCT_CARD;
    use scraper::Html;

    const SITE: &str = "https://shop.example/";

    fn expand_html(html: &str) -> Vec<(IdentityKey, ProductRecord)> {
        let doc = Html::parse_fragment(html);
        let card = doc.select(&PRODUCT_CARD).next().unwrap();
        expand(&ProductNode::new(card), SITE)
    }

    #[test]
    fn test_expand_one_record_per_colour() {
        let variants = expand_html(
            r#"<div class="product">
                <span class="product-name">Pixel 6</span>
                <span class="product-capacity">128 GB</span>
                <span data-colour="Black"></span>
                <span data-colour="Coral"></span>
                <span data-colour="White"></span>
                <div class="text-lg">£599.00</div>
            </div>"#,
        );

        assert_eq!(variants.len(), 3);
        let colours: Vec<&str> = variants.iter().map(|(_, r)| r.colour.as_str()).collect();
        assert_eq!(colours, vec!["Black", "Coral", "White"]);

        for (key, record) in &variants {
            assert_eq!(record.title, "Pixel 6 128GB");
            assert_eq!(record.price, "599.00");
            assert_eq!(record.capacity_mb, 131072);
            assert_eq!(key.as_str(), format!("{}-Pixel 6 128GB", record.colour));
        }
    }

    #[test]
    fn test_expand_no_colours_yields_nothing() {
        let variants = expand_html(
            r#"<div class="product">
                <span class="product-name">Nokia 3310</span>
                <div class="text-lg">£49.99</div>
            </div>"#,
        );
        assert!(variants.is_empty());
    }

    #[test]
    fn test_expand_keeps_repeated_colours() {
        let variants = expand_html(
            r#"<div class="product">
                <span class="product-name">Moto G</span>
                <span class="product-capacity">32GB</span>
                <span data-colour="Blue"></span>
                <span data-colour="Blue"></span>
            </div>"#,
        );

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].0, variants[1].0);
    }
}
