//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Per-attempt tracing middleware
//! - Bounded retry with a flat delay (upstream `Retry-After` wins when present)
//! - Fixed pacing delay before each logical call (3 s without key, 1 s with)

mod middleware;
pub mod request;
pub mod retry;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::Value;

pub use middleware::RequestTracing;
pub use request::{HttpMethod, QueryValue, RequestSpec};
pub use retry::RetryPolicy;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Successful upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code (2xx).
    pub status: u16,
    /// Decoded JSON body, untouched.
    pub body: Value,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// API base URL without trailing slash.
    base_url: String,

    /// Whether an API key header is sent.
    has_api_key: bool,

    /// Request timeout (for error messages).
    request_timeout: Duration,

    /// Retry budget and delay.
    retry: RetryPolicy,

    /// Delay before each logical call.
    pacing_delay: Duration,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or HTTP client
    /// initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "{}/{}",
                config.server_name,
                env!("CARGO_PKG_VERSION")
            ))?,
        );

        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let client = ClientBuilder::new(client).with(RequestTracing).build();

        Ok(Self {
            client,
            retry: RetryPolicy::from_config(&config),
            has_api_key: config.has_api_key(),
            request_timeout: config.request_timeout,
            pacing_delay: config.pacing_delay,
            base_url: config.base_url,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// Retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one logical API call with bounded retry.
    ///
    /// Attempts run strictly one after another. A retryable failure is retried
    /// until `max_retries` extra attempts have been spent; the last failure is
    /// returned with the number of attempts made.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the final attempt.
    pub async fn execute(&self, spec: &RequestSpec) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, spec.path);
        let query = spec.query_pairs();

        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            let err = match self.attempt(spec, &url, &query).await {
                Ok((status, body)) => {
                    tracing::debug!(path = %spec.path, status, attempts, "API request successful");
                    return Ok(ApiResponse { status, body, attempts });
                }
                Err(err) => err,
            };

            if !self.retry.should_retry(&err, attempts) {
                let err = err.with_attempts(attempts);
                tracing::error!(
                    method = spec.method.as_str(),
                    path = %spec.path,
                    kind = %err.kind(),
                    attempts,
                    error = %err,
                    "API request failed"
                );
                return Err(err);
            }

            let delay = self.retry.delay_for(&err);
            tracing::warn!(
                path = %spec.path,
                kind = %err.kind(),
                attempt = attempts,
                max_retries = self.retry.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying API request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// A single HTTP exchange: send, read the body, classify.
    async fn attempt(
        &self,
        spec: &RequestSpec,
        url: &str,
        query: &[(String, String)],
    ) -> ClientResult<(u16, Value)> {
        let mut builder = match spec.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if !query.is_empty() {
            builder = builder.query(query);
        }
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;

        let status = response.status().as_u16();
        let retry_after = retry::parse_retry_after(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&reqwest_middleware::Error::Reqwest(e)))?;

        if !(200..300).contains(&status) {
            return Err(retry::classify_status(status, &spec.path, retry_after, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok((status, Value::Null));
        }

        serde_json::from_slice(&bytes)
            .map(|body| (status, body))
            .map_err(|source| ClientError::InvalidResponse { status, source, attempts: 1 })
    }

    /// Map a transport failure onto the error taxonomy.
    fn transport_error(&self, err: &reqwest_middleware::Error) -> ClientError {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_builder() => {
                ClientError::InvalidRequest(e.to_string())
            }
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => ClientError::network(
                format!(
                    "Request timeout: API took too long to respond (>{}s)",
                    self.request_timeout.as_secs_f64()
                ),
                true,
            ),
            reqwest_middleware::Error::Reqwest(e) if e.is_connect() => ClientError::network(
                format!("Connection error: Unable to reach Semantic Scholar API ({e})"),
                false,
            ),
            other => ClientError::network(format!("Network error: {other}"), false),
        }
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .field("retry", &self.retry)
            .finish()
    }
}
