use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main scraper configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScraperConfig {
    /// Settings describing the target site
    #[serde(default)]
    pub site: SiteConfig,
    /// HTTP client settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// The one site whose markup the heuristic extractor understands
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Host (or parent domain) that triggers the site-specific extractor
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Base used to absolutize image URLs
    #[serde(default = "default_site_root")]
    pub root: String,
    /// Page scanned by `scan-root` when no URL is given
    #[serde(default = "default_root_url")]
    pub root_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            root: default_site_root(),
            root_url: default_root_url(),
        }
    }
}

/// Immutable settings handed to the fetcher at construction
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Skip TLS certificate validation (the target site serves a broken chain)
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    /// Headers sent with every request
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            accept_invalid_certs: default_accept_invalid_certs(),
            headers: default_headers(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Default value functions
fn default_domain() -> String {
    "kilometre0.cat".to_string()
}

fn default_site_root() -> String {
    "https://www.kilometre0.cat".to_string()
}

fn default_root_url() -> String {
    "https://www.kilometre0.cat/".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_headers() -> BTreeMap<String, String> {
    [
        ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
        ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
        ("Accept-Language", "ca,es-ES;q=0.8,es;q=0.6,en;q=0.4"),
        ("Connection", "keep-alive"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Sec-Fetch-User", "?1"),
        ("Pragma", "no-cache"),
        ("Cache-Control", "no-cache"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with KM0__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: KM0__FETCH__TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// See [`ScraperConfig::load`]
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested keys: KM0__SITE__DOMAIN
        .add_source(
            Environment::with_prefix("KM0")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
