//! Configuration management for the Venuity client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Candidate base URLs, tried in order until one answers
    pub base_urls: Vec<String>,
    /// Endpoint paths whose 401 is returned to the caller instead of ending the session
    pub soft_fail_endpoints: Vec<String>,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one JSON file per cache key
    pub directory: PathBuf,
    pub bookings_key: String,
    pub favorites_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ListingConfig {
    pub page_size: usize,
}

/// Public web links used in share payloads
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LinksConfig {
    pub web_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// When set, logs also go to a daily rolling file in this directory
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let api_urls = env::var("VENUITY_API_URLS").ok().map(|raw| {
            raw.split(',')
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect::<Vec<_>>()
        });

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (VENUITY__API__USER_AGENT, ...)
            .add_source(
                Environment::with_prefix("VENUITY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_urls", api_urls)?
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_urls.is_empty() {
            return Err(ConfigError::Message(
                "api.base_urls must list at least one URL".to_string(),
            ));
        }
        if !self.links.web_url.starts_with("http") {
            return Err(ConfigError::Message(
                "links.web_url must be an http(s) URL".to_string(),
            ));
        }
        if self.listing.page_size == 0 {
            return Err(ConfigError::Message(
                "listing.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_urls: vec![
                "https://api.venuity.app".to_string(),
                "https://api-fallback.venuity.app".to_string(),
            ],
            soft_fail_endpoints: vec!["/api/users/profile".to_string()],
            user_agent: format!("venuity-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".venuity-cache"),
            bookings_key: "venuity.bookings".to_string(),
            favorites_key: "venuity.favorites".to_string(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 8 }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            web_url: "https://venuity.app".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
