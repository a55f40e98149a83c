/// HTTP implementation of the upstream catalog client
///
/// API Flow:
/// 1. Similar ids: GET {base}/product/{id}/similarids → JSON array of ids
/// 2. Details:     GET {base}/product/{id}            → JSON product object
///
/// Both calls go through the shared [`RetryPolicy`]. Whatever is left after retrying is
/// logged and degraded to "no result"; nothing from the transport reaches callers.
use crate::{
    config::Config,
    error::AppResult,
    models::Product,
    services::{
        providers::ProductClient,
        retry::{RetryPolicy, Retryable},
    },
};
use reqwest::{header::ACCEPT, Client as HttpClient, StatusCode, Url};
use serde::de::DeserializeOwned;

const SIMILAR_IDS: &str = "similar_ids";
const PRODUCT_DETAIL: &str = "product_detail";

/// Why a single upstream attempt failed
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    #[error("malformed upstream payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Status(status) if *status == StatusCode::NOT_FOUND)
    }
}

impl Retryable for UpstreamError {
    /// Network failures and 5xx responses may succeed on another try; client errors,
    /// unexpected statuses and unreadable payloads will not.
    fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Transport(err) => !err.is_builder(),
            UpstreamError::Status(status) => status.is_server_error(),
            UpstreamError::Malformed(_) => false,
        }
    }
}

/// Builds the process-wide HTTP transport shared by every upstream call
pub fn build_http_client(config: &Config) -> anyhow::Result<HttpClient> {
    HttpClient::builder()
        .timeout(config.http_timeout())
        .connect_timeout(config.http_connect_timeout())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

#[derive(Clone, Debug)]
pub struct HttpProductClient {
    http_client: HttpClient,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpProductClient {
    pub fn new(http_client: HttpClient, base_url: Url, retry: RetryPolicy) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Upstream URL {} cannot be used as a base URL", base_url);
        }

        Ok(Self {
            http_client,
            base_url,
            retry,
        })
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> anyhow::Result<Self> {
        Self::new(
            http_client,
            config.upstream_base_url()?,
            RetryPolicy::from_config(config),
        )
    }

    /// Appends percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot fail: base URLs are checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// One attempt. `Ok(None)` means a successful response with an empty body.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>, UpstreamError> {
        let response = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Option<T> {
        let target = &url;
        let outcome = self
            .retry
            .execute(move |_| self.fetch_json::<T>(target))
            .await;
        let attempts = outcome.attempts;

        match outcome.result {
            Ok(Some(value)) => {
                tracing::debug!(operation, url = %url, attempts, "Upstream call succeeded");
                Some(value)
            }
            Ok(None) => {
                tracing::debug!(operation, url = %url, attempts, "Upstream returned an empty body");
                None
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(operation, url = %url, attempts, "Upstream resource not found");
                None
            }
            Err(err) => {
                tracing::warn!(
                    operation,
                    url = %url,
                    attempts,
                    retryable = err.is_retryable(),
                    error = %err,
                    "Upstream call failed, treating as no result"
                );
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl ProductClient for HttpProductClient {
    async fn list_similar_ids(&self, product_id: &str) -> AppResult<Vec<String>> {
        let url = self.endpoint(&["product", product_id, "similarids"]);
        let ids: Vec<String> = self
            .get_with_retry(SIMILAR_IDS, url)
            .await
            .unwrap_or_default();

        tracing::info!(
            product_id = %product_id,
            results = ids.len(),
            "Similar ids fetched"
        );

        Ok(ids)
    }

    async fn get_product_details(&self, product_id: &str) -> AppResult<Option<Product>> {
        let url = self.endpoint(&["product", product_id]);
        Ok(self.get_with_retry(PRODUCT_DETAIL, url).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str) -> HttpProductClient {
        HttpProductClient::new(
            HttpClient::new(),
            Url::parse(base).unwrap(),
            RetryPolicy::new(3, Duration::ZERO),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("http://localhost:3001");
        let url = client.endpoint(&["product", "123", "similarids"]);
        assert_eq!(url.as_str(), "http://localhost:3001/product/123/similarids");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://catalog.local/api/v1/");
        let url = client.endpoint(&["product", "7"]);
        assert_eq!(url.as_str(), "http://catalog.local/api/v1/product/7");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = client("http://localhost:3001");
        let url = client.endpoint(&["product", "a b/c?d", "similarids"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/product/a%20b%2Fc%3Fd/similarids"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = HttpProductClient::new(
            HttpClient::new(),
            Url::parse("mailto:catalog@example.com").unwrap(),
            RetryPolicy::new(1, Duration::ZERO),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_classification() {
        let server = UpstreamError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        let unavailable = UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE);
        let not_found = UpstreamError::Status(StatusCode::NOT_FOUND);
        let bad_request = UpstreamError::Status(StatusCode::BAD_REQUEST);

        assert!(server.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(not_found.is_not_found());
        assert!(!bad_request.is_retryable());
        assert!(!bad_request.is_not_found());
    }

    #[test]
    fn test_malformed_payload_is_final() {
        let err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
        assert!(!UpstreamError::Malformed(err).is_retryable());
    }
}
