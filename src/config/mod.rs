//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetch::FetcherConfig;
use crate::scrape::ScrapeConfig;
use crate::storage::OutputFormat;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Storefront being scraped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root; must end with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listing category path under the site root
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_base_url() -> String {
    "https://www.magpiehq.com/developer-challenge/".to_string()
}

fn default_category() -> String {
    "smartphones".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category: default_category(),
        }
    }
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Seconds a cached page is reused; 0 disables reuse
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum milliseconds between requests
    #[serde(default)]
    pub request_delay_ms: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./data/raw")
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_timeout() -> u64 {
    30
}

fn default_max_content_size() -> usize {
    50 * 1024 * 1024
}

fn default_user_agent() -> String {
    FetcherConfig::default().user_agent
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache_ttl_seconds: default_cache_ttl(),
            timeout_seconds: default_timeout(),
            max_content_size: default_max_content_size(),
            user_agent: default_user_agent(),
            request_delay_ms: 0,
        }
    }
}

/// Where and how the catalog is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            site: SiteConfig::default(),
            fetch: FetchSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.site_url()?;
        if !base.path().ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "Site base URL must end with '/': {}",
                base
            )));
        }

        if self.site.category.trim().trim_start_matches('/').is_empty() {
            return Err(ConfigError::ValidationError(
                "Category must not be empty".to_string(),
            ));
        }

        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Fetch timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed site base URL.
    pub fn site_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid site base URL {:?}: {}",
                self.site.base_url, e
            ))
        })
    }

    /// Scrape target built from the site section.
    pub fn scrape_config(&self) -> Result<ScrapeConfig, ConfigError> {
        Ok(ScrapeConfig::new(self.site_url()?, self.site.category.trim()))
    }

    /// Fetcher settings built from the fetch section.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            cache_dir: self.fetch.cache_dir.clone(),
            cache_ttl: Duration::from_secs(self.fetch.cache_ttl_seconds),
            max_content_size: self.fetch.max_content_size,
            timeout: Duration::from_secs(self.fetch.timeout_seconds),
            user_agent: self.fetch.user_agent.clone(),
            request_delay: Duration::from_millis(self.fetch.request_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.site.base_url,
            "https://www.magpiehq.com/developer-challenge/"
        );
        assert_eq!(config.site.category, "smartphones");
        assert_eq!(config.output.path, PathBuf::from("output.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = AppConfig::default();
        config.site.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_missing_trailing_slash() {
        let mut config = AppConfig::default();
        config.site.base_url = "https://shop.example/store".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_empty_category() {
        let mut config = AppConfig::default();
        config.site.category = "  ".to_string();
        assert!(config.validate().is_err());

        config.site.category = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.fetch.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
            [site]
            category = "tablets"

            [output]
            format = "jsonl"
            "#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.site.category, "tablets");
        assert_eq!(config.site.base_url, default_base_url());
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.fetch.timeout_seconds, 30);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.site.category, "smartphones");
    }

    #[test]
    fn test_scrape_and_fetcher_config() {
        let mut config = AppConfig::default();
        config.fetch.request_delay_ms = 250;

        let scrape = config.scrape_config().unwrap();
        assert_eq!(
            scrape.listing_url().unwrap().as_str(),
            "https://www.magpiehq.com/developer-challenge/smartphones"
        );

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.request_delay, Duration::from_millis(250));
        assert_eq!(fetcher.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.site.base_url, parsed.site.base_url);
        assert_eq!(config.output.format, parsed.output.format);
    }
}
