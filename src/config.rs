//! Source definitions
//!
//! YAML description of an HTTP-backed paginated collection, e.g.
//!
//! ```yaml
//! base_url: https://api.example.com
//! path: /v1/discover
//! items_path: projects
//! more_path: urls.api.more_projects
//! query:
//!   sort: magic
//! headers:
//!   Accept: application/json
//! rate_limit:
//!   requests_per_second: 5
//! pager:
//!   max_retries: 2
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{check_path, HttpClient, HttpClientConfig, HttpSource, RateLimiterConfig};
use crate::pagination::{PagerConfig, DEFAULT_MAX_RETRIES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A paginated JSON collection reachable over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// First-page path under the base URL
    #[serde(default)]
    pub path: String,

    /// Dotted path to the items array in each response
    pub items_path: String,

    /// Dotted path to the next-page URL in each response
    pub more_path: String,

    /// Query parameters sent with the first page
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional request rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Pager policies
    #[serde(default)]
    pub pager: PagerOptions,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Pager policies that can be set from a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerOptions {
    /// Retries after a failed fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Reset the accumulated list on every start-over
    #[serde(default)]
    pub clear_on_start_over: bool,

    /// Suppress consecutive equal snapshots
    #[serde(default)]
    pub distinct_until_changed: bool,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            clear_on_start_over: false,
            distinct_until_changed: false,
        }
    }
}

impl SourceConfig {
    /// Parse and validate a source definition from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a source definition from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Check required fields and URL syntax
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.items_path.trim().is_empty() {
            return Err(Error::missing_field("items_path"));
        }
        if self.more_path.trim().is_empty() {
            return Err(Error::missing_field("more_path"));
        }
        for (field, path) in [("items_path", &self.items_path), ("more_path", &self.more_path)] {
            check_path(path).map_err(|e| Error::invalid_value(field, e.to_string()))?;
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// Build the HTTP client config for this source
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs));
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }

    /// Build the page source for this definition
    pub fn http_source(&self) -> Result<HttpSource> {
        let client = HttpClient::with_config(self.http_config())?;
        let source = self.query.iter().fold(
            HttpSource::new(client, &self.path, &self.items_path, &self.more_path),
            |source, (key, value)| source.with_query(key, value),
        );
        Ok(source)
    }

    /// Build a pager config over this source
    pub fn pager_config(&self) -> Result<PagerConfig<HttpSource>> {
        Ok(PagerConfig::from_source(self.http_source()?)
            .with_max_retries(self.pager.max_retries)
            .with_clear_on_start_over(self.pager.clear_on_start_over)
            .with_distinct_until_changed(self.pager.distinct_until_changed))
    }
}
