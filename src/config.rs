//! Client options
//!
//! `Options` holds everything that decides where and how requests are made:
//! the catalog host, the scheme, the OData service and the transport
//! settings. Options can be built in code, loaded from a YAML (or JSON) file
//! and overridden from the environment.
//!
//! Precedence when combining sources: explicit setters (CLI flags) >
//! environment variables > config file > defaults.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{ApiService, BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Host of the main CBS open data catalog
pub const DEFAULT_CATALOG_URL: &str = "opendata.cbs.nl";

/// Host of the third-party ("derden") catalog
pub const DERDEN_CATALOG_URL: &str = "dataderden.cbs.nl";

/// Environment variable names read by [`Options::apply_env`]
pub mod env {
    pub const CATALOG_URL: &str = "CBSODATA_CATALOG_URL";
    pub const USE_HTTPS: &str = "CBSODATA_USE_HTTPS";
    pub const SERVICE: &str = "CBSODATA_SERVICE";
    pub const PROXY: &str = "CBSODATA_PROXY";
    pub const TIMEOUT_SECS: &str = "CBSODATA_TIMEOUT_SECS";
    pub const MAX_RETRIES: &str = "CBSODATA_MAX_RETRIES";
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Catalog host, e.g. `opendata.cbs.nl`
    pub catalog_url: String,

    /// Use `https` instead of `http`
    pub use_https: bool,

    /// OData service serving table resources
    pub service: ApiService,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries per request (0 = fail fast)
    pub max_retries: u32,

    /// Backoff between retries
    pub backoff: BackoffType,

    /// Client-side throttle, requests per second
    pub requests_per_second: Option<u32>,

    /// Proxy URL for all requests
    pub proxy: Option<String>,

    /// User agent header
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            use_https: false,
            service: ApiService::Api,
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffType::Exponential,
            requests_per_second: None,
            proxy: None,
            user_agent: format!("cbsodata/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Options {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog host
    #[must_use]
    pub fn with_catalog_url(mut self, catalog_url: impl Into<String>) -> Self {
        self.catalog_url = catalog_url.into();
        self
    }

    /// Enable or disable https
    #[must_use]
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Set the OData service
    #[must_use]
    pub fn with_service(mut self, service: ApiService) -> Self {
        self.service = service;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set max retries per request
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the backoff strategy
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType) -> Self {
        self.backoff = backoff;
        self
    }

    /// Throttle requests client-side
    #[must_use]
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Route all requests through a proxy
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse options from a YAML or JSON document
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let options: Options = serde_yaml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let options = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        options.apply_env()
    }

    /// Override fields from `CBSODATA_*` environment variables
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup; empty values are ignored
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).none_if_empty();

        if let Some(url) = get(env::CATALOG_URL) {
            self.catalog_url = url;
        }
        if let Some(value) = get(env::USE_HTTPS) {
            self.use_https = parse_bool(env::USE_HTTPS, &value)?;
        }
        if let Some(value) = get(env::SERVICE) {
            self.service = value
                .parse()
                .map_err(|e: String| Error::invalid_value(env::SERVICE, e))?;
        }
        if let Some(proxy) = get(env::PROXY) {
            self.proxy = Some(proxy);
        }
        if let Some(value) = get(env::TIMEOUT_SECS) {
            self.timeout_secs = value
                .trim()
                .parse()
                .map_err(|e| Error::invalid_value(env::TIMEOUT_SECS, format!("{e}")))?;
        }
        if let Some(value) = get(env::MAX_RETRIES) {
            self.max_retries = value
                .trim()
                .parse()
                .map_err(|e| Error::invalid_value(env::MAX_RETRIES, format!("{e}")))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check option values
    pub fn validate(&self) -> Result<()> {
        if self.catalog_url.trim().is_empty() {
            return Err(Error::invalid_value("catalog_url", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Transport settings derived from these options
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(self.timeout())
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(500),
                Duration::from_secs(30),
            )
            .user_agent(&self.user_agent);

        builder = match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy);
        }

        builder.build()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::invalid_value(
            field,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
