use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_catalog::config::AppConfig;
use storefront_catalog::fetch::Fetcher;
use storefront_catalog::parse_listing;
use storefront_catalog::scrape::ScrapeOrchestrator;
use storefront_catalog::storage::{write_catalog, OutputFormat};

#[derive(Parser)]
#[command(name = "storefront-catalog")]
#[command(about = "Scrape a paginated storefront listing into a product catalog")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./catalog.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every listing page and write the catalog
    Scrape {
        /// Site base URL (must end with '/')
        #[arg(long)]
        base_url: Option<String>,

        /// Listing category under the base URL
        #[arg(long)]
        category: Option<String>,

        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: "json" or "jsonl"
        #[arg(long)]
        format: Option<String>,

        /// Always fetch from the network
        #[arg(long)]
        no_cache: bool,

        /// Scrape but don't write the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a saved listing page and print its records
    ParseFixture {
        /// Path to an HTML listing page
        path: PathBuf,

        /// Site base URL used to resolve image paths
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config {:?}", cli.config))?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting storefront-catalog v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Scrape {
            base_url,
            category,
            output,
            format,
            no_cache,
            dry_run,
        } => {
            if let Some(url) = base_url {
                config.site.base_url = url;
            }
            if let Some(category) = category {
                config.site.category = category;
            }
            if let Some(path) = output {
                config.output.path = path;
            }
            if let Some(format) = format {
                config.output.format = format.parse::<OutputFormat>()?;
            }
            config.validate()?;

            let mut fetcher_config = config.fetcher_config();
            if no_cache {
                fetcher_config.cache_ttl = Duration::ZERO;
            }
            let fetcher = Fetcher::new(fetcher_config).context("failed to create fetcher")?;

            println!("Starting web scraping ...\n");
            let orchestrator = ScrapeOrchestrator::new(config.scrape_config()?, Arc::new(fetcher));
            let result = orchestrator.run().await.context("scrape failed")?;

            for page in &result.pages {
                println!("Page: {}", page.page);
                println!("Product Scraped: {}\n", page.new_products);
            }

            println!(
                "Script executed in: {:.2} seconds.",
                result.duration.as_secs_f64()
            );
            println!("----------------------------------------------\n");

            println!("=== Scrape Results ===");
            println!("Product Found:           {}", result.stats.total_variants_seen);
            println!("Duplicate Product Found: {}", result.stats.duplicates_found);
            println!("Product Scraped:         {}", result.stats.unique_products);

            if dry_run {
                println!("\n(dry run - no data written to disk)");
            } else {
                let written =
                    write_catalog(&config.output.path, config.output.format, &result.records)
                        .with_context(|| {
                            format!("failed to write output {:?}", config.output.path)
                        })?;
                println!(
                    "\nWrote {} products to {} ({})",
                    written,
                    config.output.path.display(),
                    config.output.format
                );
            }
        }
        Commands::ParseFixture { path, base_url } => {
            tracing::info!("Parsing fixture: {:?}", path);

            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read fixture {:?}", path))?;
            let site_url = base_url.unwrap_or_else(|| config.site.base_url.clone());

            let (catalog, pages) = parse_listing(&html, &site_url);
            let stats = catalog.stats();

            println!("{}", serde_json::to_string_pretty(catalog.records())?);
            println!("\n=== Fixture Results ===");
            println!("Last page:               {}", pages);
            println!("Product Found:           {}", stats.total_variants_seen);
            println!("Duplicate Product Found: {}", stats.duplicates_found);
            println!("Product Scraped:         {}", stats.unique_products);
        }
    }

    Ok(())
}
