//! Error types for the Semantic Scholar MCP server.
//!
//! Uses `thiserror` for structured error handling. Every failure a tool can
//! produce maps onto one [`ErrorKind`], which is what agents see in the
//! `tools/call` result.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};

/// Failure taxonomy reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller supplied a malformed or missing argument. Never retried.
    InvalidParameter,
    /// Upstream answered 429. Retried up to the budget.
    RateLimited,
    /// Upstream answered 5xx. Retried up to the budget.
    ServerError,
    /// Connection, DNS, TLS or timeout failure. Retried up to the budget.
    NetworkError,
    /// Upstream rejected the request (4xx other than 429). Never retried.
    UpstreamClientError,
    /// Upstream answered 2xx with a body that is not JSON. Never retried.
    InvalidResponse,
}

impl ErrorKind {
    /// Stable snake_case name used in result envelopes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "invalid_parameter",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
            Self::UpstreamClientError => "upstream_client_error",
            Self::InvalidResponse => "invalid_response",
        }
    }

    /// Whether failures of this kind are worth another attempt.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError | Self::NetworkError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Rate limited by Semantic Scholar API (429 response)
    #[error("Rate limit exceeded (429) after {attempts} attempt(s): {message}")]
    RateLimited {
        /// Upstream message or body excerpt
        message: String,
        /// Wait time suggested by the `Retry-After` header
        retry_after: Option<Duration>,
        /// Attempts made, including the first
        attempts: u32,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}) after {attempts} attempt(s): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Upstream message or body excerpt
        message: String,
        /// Wait time suggested by the `Retry-After` header
        retry_after: Option<Duration>,
        /// Attempts made, including the first
        attempts: u32,
    },

    /// Transport failure (connection, DNS, TLS, timeout)
    #[error("{message} (after {attempts} attempt(s))")]
    Network {
        /// Human readable description
        message: String,
        /// True when the configured request timeout elapsed
        timed_out: bool,
        /// Attempts made, including the first
        attempts: u32,
    },

    /// Upstream rejected the request (4xx other than 429, or another non-2xx status)
    #[error("{message}")]
    UpstreamClient {
        /// HTTP status code
        status: u16,
        /// Upstream message or body excerpt
        message: String,
        /// Attempts made, including the first
        attempts: u32,
    },

    /// Successful status with a body that is not valid JSON
    #[error("Invalid JSON response from API ({status}): {source}")]
    InvalidResponse {
        /// HTTP status code
        status: u16,
        /// Decoder error
        #[source]
        source: serde_json::Error,
        /// Attempts made, including the first
        attempts: u32,
    },

    /// The request could not be built (bad header value, unusable URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self::RateLimited { message: message.into(), retry_after, attempts: 1 }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self::Server { status, message: message.into(), retry_after, attempts: 1 }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>, timed_out: bool) -> Self {
        Self::Network { message: message.into(), timed_out, attempts: 1 }
    }

    /// Create an upstream client error.
    #[must_use]
    pub fn upstream_client(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamClient { status, message: message.into(), attempts: 1 }
    }

    /// Failure kind for result envelopes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Network { .. } => ErrorKind::NetworkError,
            Self::UpstreamClient { .. } => ErrorKind::UpstreamClientError,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            Self::InvalidRequest(_) => ErrorKind::InvalidParameter,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Last observed HTTP status, if the upstream answered at all.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. }
            | Self::UpstreamClient { status, .. }
            | Self::InvalidResponse { status, .. } => Some(*status),
            Self::Network { .. } | Self::InvalidRequest(_) => None,
        }
    }

    /// Get the retry-after hint if the upstream sent one.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } | Self::Server { retry_after, .. } => {
                *retry_after
            }
            _ => None,
        }
    }

    /// Number of upstream attempts made before this error was surfaced.
    ///
    /// Requests rejected before sending count as a single attempt.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::RateLimited { attempts, .. }
            | Self::Server { attempts, .. }
            | Self::Network { attempts, .. }
            | Self::UpstreamClient { attempts, .. }
            | Self::InvalidResponse { attempts, .. } => *attempts,
            Self::InvalidRequest(_) => 1,
        }
    }

    /// Record the attempt count of the call that ended with this error.
    #[must_use]
    pub fn with_attempts(mut self, count: u32) -> Self {
        match &mut self {
            Self::RateLimited { attempts, .. }
            | Self::Server { attempts, .. }
            | Self::Network { attempts, .. }
            | Self::UpstreamClient { attempts, .. }
            | Self::InvalidResponse { attempts, .. } => *attempts = count,
            Self::InvalidRequest(_) => {}
        }
        self
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the API client
    #[error("API request failed: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Invalid parameter '{field}': {message}")]
    Validation {
        /// Argument that failed validation
        field: String,
        /// Validation error message
        message: String,
    },
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Failure kind for result envelopes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Client(e) => e.kind(),
            Self::Validation { .. } => ErrorKind::InvalidParameter,
        }
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::RateLimited { message, attempts, .. }) => format!(
                "Rate limited by Semantic Scholar API after {attempts} attempt(s): {message}. \
                 Wait before retrying or configure SEMANTIC_SCHOLAR_API_KEY."
            ),
            Self::Client(ClientError::UpstreamClient { status: 404, message, .. }) => {
                format!("{message}. Please check the ID is correct.")
            }
            Self::Client(e) => e.to_string(),
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
        }
    }

    /// Structured failure body returned to the agent.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_user_message(),
        });
        match self {
            Self::Client(e) => {
                if let Some(status) = e.status_code() {
                    error["status_code"] = json!(status);
                }
                error["attempts"] = json!(e.attempts());
            }
            Self::Validation { field, .. } => {
                error["parameter"] = json!(field);
            }
        }
        json!({ "error": error })
    }
}

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A numeric setting was present but unusable
    #[error("{var}={value:?} is invalid: {reason}")]
    InvalidNumber {
        /// Environment variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The base URL could not be parsed
    #[error("{var}={value:?} is not a valid URL: {reason}")]
    InvalidUrl {
        /// Environment variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited("slow down", None).is_retryable());
        assert!(ClientError::network("timeout", true).is_retryable());
        assert!(ClientError::server(503, "unavailable", None).is_retryable());

        assert!(!ClientError::upstream_client(404, "paper123").is_retryable());
        assert!(!ClientError::upstream_client(400, "invalid query").is_retryable());
        assert!(!ClientError::InvalidRequest("bad header".into()).is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited("slow down", Some(Duration::from_secs(60)));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::upstream_client(404, "paper");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_with_attempts_records_terminal_count() {
        let err = ClientError::server(500, "boom", None).with_attempts(4);
        assert_eq!(err.attempts(), 4);

        // A 404 after two retried 503s still reports three attempts.
        let err = ClientError::upstream_client(404, "missing").with_attempts(3);
        assert_eq!(err.attempts(), 3);
        assert_eq!(ToolError::from(err).to_json()["error"]["attempts"], 3);

        let err = ClientError::InvalidRequest("bad header".into()).with_attempts(4);
        assert_eq!(err.attempts(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::RateLimited.as_str(), "rate_limited");
        assert_eq!(
            serde_json::to_value(ErrorKind::UpstreamClientError).unwrap(),
            json!("upstream_client_error")
        );
    }

    #[test]
    fn test_tool_error_json_envelope() {
        let err = ToolError::validation("limit", "must be between 1 and 100");
        let body = err.to_json();
        assert_eq!(body["error"]["kind"], "invalid_parameter");
        assert_eq!(body["error"]["parameter"], "limit");
        assert!(body["error"].get("status_code").is_none());

        let err = ToolError::from(ClientError::rate_limited("slow", None).with_attempts(4));
        let body = err.to_json();
        assert_eq!(body["error"]["kind"], "rate_limited");
        assert_eq!(body["error"]["status_code"], 429);
        assert_eq!(body["error"]["attempts"], 4);
    }

    #[test]
    fn test_tool_error_user_message() {
        let err = ToolError::validation("query", "cannot be empty");
        assert!(err.to_user_message().contains("query"));
        assert!(err.to_user_message().contains("cannot be empty"));

        let err =
            ToolError::from(ClientError::rate_limited("quota exhausted", None).with_attempts(2));
        let message = err.to_user_message();
        assert!(message.contains("after 2 attempt(s): quota exhausted"), "{message}");
    }
}
