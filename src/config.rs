use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the upstream product catalog
    #[serde(default = "default_similar_products_url")]
    pub similar_products_url: String,

    /// Attempts per upstream call, including the first one
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Fixed wait between attempts in milliseconds
    #[serde(default = "default_retry_wait_duration_ms")]
    pub retry_wait_duration_ms: u64,

    /// Per-attempt timeout for upstream calls in milliseconds
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    #[serde(default = "default_http_connect_timeout_ms")]
    pub http_connect_timeout_ms: u64,

    /// Upper bound on concurrent detail lookups for a single request
    #[serde(default = "default_detail_fetch_concurrency")]
    pub detail_fetch_concurrency: usize,

    /// Deadline for a whole inbound request in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_similar_products_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_wait_duration_ms() -> u64 {
    500
}

fn default_http_timeout_ms() -> u64 {
    2000
}

fn default_http_connect_timeout_ms() -> u64 {
    1000
}

fn default_detail_fetch_concurrency() -> usize {
    8
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Loads a `.env` file into the process environment when one is present
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        load_dotenv();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retry_max_attempts == 0 {
            anyhow::bail!("RETRY_MAX_ATTEMPTS must be at least 1");
        }
        if self.detail_fetch_concurrency == 0 {
            anyhow::bail!("DETAIL_FETCH_CONCURRENCY must be at least 1");
        }
        if self.request_timeout_ms == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_MS must be positive");
        }
        self.upstream_base_url()?;
        Ok(())
    }

    /// Parsed upstream base URL; it must be able to carry path segments
    pub fn upstream_base_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.similar_products_url).map_err(|e| {
            anyhow::anyhow!(
                "Invalid SIMILAR_PRODUCTS_URL {:?}: {}",
                self.similar_products_url,
                e
            )
        })?;
        if url.cannot_be_a_base() {
            anyhow::bail!(
                "SIMILAR_PRODUCTS_URL {:?} cannot be used as a base URL",
                self.similar_products_url
            );
        }
        Ok(url)
    }

    pub fn retry_wait(&self) -> Duration {
        Duration::from_millis(self.retry_wait_duration_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn http_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.http_connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
