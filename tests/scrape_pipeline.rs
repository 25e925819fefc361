//! End-to-end scrape over an in-memory two-page listing.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;

use storefront_catalog::fetch::MockPageSource;
use storefront_catalog::scrape::{ScrapeConfig, ScrapeOrchestrator};
use storefront_catalog::storage::{write_catalog, OutputFormat};
use storefront_catalog::{CatalogStats, ProductRecord};

const SITE: &str = "https://www.magpiehq.com/developer-challenge/";

const IPHONE_CARD: &str = r#"
<div class="product px-4 py-4 md:w-1/2 lg:w-1/4">
    <div class="bg-white p-4 rounded-md">
        <h3>
            <span class="product-name">iPhone 12 Pro Max</span>
            <span class="product-capacity">128 GB</span>
        </h3>
        <img src="../images/iphone-12-pro.png" alt="iPhone 12 Pro Max" class="mx-auto md:w-1/2">
        <div>
            <div class="flex flex-wrap justify-center -mx-2">
                <div class="px-2"><span data-colour="Sky Blue" class="border border-black rounded-full block w-4 h-4"></span></div>
                <div class="px-2"><span data-colour="Black" class="border border-black rounded-full block w-4 h-4"></span></div>
            </div>
        </div>
        <div class="my-8 block text-center text-lg">£1,099.99</div>
        <div class="my-4 text-sm block text-center">Availability: In Stock</div>
        <div class="my-4 text-sm block text-center">Delivery by Thursday 23rd Jan 2025</div>
    </div>
</div>
"#;

const NOKIA_CARD: &str = r#"
<div class="product px-4 py-4 md:w-1/2 lg:w-1/4">
    <div class="bg-white p-4 rounded-md">
        <h3>
            <span class="product-name">Nokia 105</span>
            <span class="product-capacity">4 MB</span>
        </h3>
        <img src="../images/nokia-105.png" alt="Nokia 105">
        <div class="px-2"><span data-colour="Blue"></span></div>
        <div class="my-8 block text-center text-lg">£19.99</div>
        <div class="my-4 text-sm block text-center">Availability: Out of Stock</div>
    </div>
</div>
"#;

const PIXEL_CARD: &str = r#"
<div class="product px-4 py-4 md:w-1/2 lg:w-1/4">
    <div class="bg-white p-4 rounded-md">
        <h3>
            <span class="product-name">Pixel 7</span>
            <span class="product-capacity">256GB</span>
        </h3>
        <img src="../images/pixel-7.png" alt="Pixel 7">
        <div class="px-2"><span data-colour="Obsidian"></span></div>
        <div class="my-8 block text-center text-lg">£599.00</div>
        <div class="my-4 text-sm block text-center">Availability: In Stock Online only</div>
        <div class="my-4 text-sm block text-center">Ships 2025-02-14</div>
    </div>
</div>
"#;

fn listing_page(cards: &[&str]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
    <div id="products" class="flex flex-wrap -mx-4">{}</div>
    <div id="pages" class="flex justify-center">
        <div>
            <a href="?page=1" class="active">1</a>
            <a href="?page=2">2</a>
        </div>
    </div>
</body>
</html>"#,
        cards.concat()
    )
}

fn two_page_source() -> MockPageSource {
    MockPageSource::new()
        .with_page(
            "https://www.magpiehq.com/developer-challenge/smartphones",
            listing_page(&[IPHONE_CARD, NOKIA_CARD]),
        )
        .with_page(
            "https://www.magpiehq.com/developer-challenge/smartphones?page=2",
            listing_page(&[IPHONE_CARD, PIXEL_CARD]),
        )
}

fn orchestrator(source: MockPageSource) -> ScrapeOrchestrator {
    let config = ScrapeConfig::new(Url::parse(SITE).unwrap(), "smartphones");
    ScrapeOrchestrator::new(config, Arc::new(source))
}

#[tokio::test]
async fn test_two_page_listing_counts() {
    let result = orchestrator(two_page_source()).run().await.unwrap();

    assert_eq!(
        result.stats,
        CatalogStats {
            total_variants_seen: 6,
            duplicates_found: 2,
            unique_products: 4,
        }
    );
    assert_eq!(result.records.len(), 4);
    assert!(result.stats.is_consistent());

    let per_page: Vec<(u32, u64)> = result
        .pages
        .iter()
        .map(|p| (p.page, p.new_products))
        .collect();
    assert_eq!(per_page, vec![(1, 3), (2, 1)]);
}

#[tokio::test]
async fn test_two_page_listing_records() {
    let result = orchestrator(two_page_source()).run().await.unwrap();

    let keys: Vec<(&str, &str)> = result
        .records
        .iter()
        .map(|r| (r.title.as_str(), r.colour.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("iPhone 12 Pro Max 128GB", "Sky Blue"),
            ("iPhone 12 Pro Max 128GB", "Black"),
            ("Nokia 105 4MB", "Blue"),
            ("Pixel 7 256GB", "Obsidian"),
        ]
    );

    assert_eq!(
        result.records[0],
        ProductRecord {
            title: "iPhone 12 Pro Max 128GB".to_string(),
            price: "1099.99".to_string(),
            image_url: format!("{}/images/iphone-12-pro.png", SITE),
            capacity_mb: 131072,
            colour: "Sky Blue".to_string(),
            availability_text: "In Stock".to_string(),
            is_available: true,
            shipping_text: "Delivery by Thursday 23rd Jan 2025".to_string(),
            shipping_date: "2025-01-23".to_string(),
        }
    );

    let nokia = &result.records[2];
    assert_eq!(nokia.capacity_mb, 4);
    assert_eq!(nokia.availability_text, "Out of Stock");
    assert!(!nokia.is_available);
    assert_eq!(nokia.shipping_text, "");
    assert_eq!(nokia.shipping_date, "");

    let pixel = &result.records[3];
    assert_eq!(pixel.capacity_mb, 262144);
    assert_eq!(pixel.availability_text, "In Stock");
    assert_eq!(pixel.shipping_date, "2025-02-14");
}

#[tokio::test]
async fn test_scrape_then_write_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.json");

    let result = orchestrator(two_page_source()).run().await.unwrap();
    write_catalog(&path, OutputFormat::Json, &result.records).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let array = value.as_array().unwrap();

    assert_eq!(array.len(), 4);
    assert_eq!(array[0]["capacityMB"], serde_json::json!(131072));
    assert_eq!(array[2]["isAvailable"], serde_json::json!(false));
    assert_eq!(array[3]["shippingDate"], serde_json::json!("2025-02-14"));
}

#[tokio::test]
async fn test_missing_second_page_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output.json");

    let source = MockPageSource::new().with_page(
        "https://www.magpiehq.com/developer-challenge/smartphones",
        listing_page(&[IPHONE_CARD]),
    );

    let outcome = orchestrator(source).run().await;
    assert!(outcome.is_err());
    if let Ok(result) = outcome {
        write_catalog(&path, OutputFormat::Json, &result.records).unwrap();
    }
    assert!(!path.exists());
}
