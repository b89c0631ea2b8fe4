//! Flat-delay retry policy and upstream status classification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::config::Config;
use crate::error::ClientError;

/// Longest upstream body excerpt kept in error messages.
const MAX_MESSAGE_LEN: usize = 500;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first.
    pub max_retries: u32,
    /// Wait between attempts.
    pub delay: Duration,
    /// Ceiling applied to `Retry-After` hints.
    pub max_retry_after: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.retry_delay,
            max_retry_after: config.max_retry_after,
        }
    }

    /// Whether another attempt is allowed after `attempts_made` attempts failed with `err`.
    #[must_use]
    pub const fn should_retry(&self, err: &ClientError, attempts_made: u32) -> bool {
        err.is_retryable() && attempts_made <= self.max_retries
    }

    /// Wait before the next attempt. An upstream hint replaces the flat delay.
    #[must_use]
    pub fn delay_for(&self, err: &ClientError) -> Duration {
        err.retry_after().map_or(self.delay, |hint| hint.min(self.max_retry_after))
    }
}

/// Parse a `Retry-After` header given as delta-seconds or an HTTP-date.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = raw.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).ok();
    }

    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}

/// Turn a non-2xx response into the matching [`ClientError`].
#[must_use]
pub fn classify_status(
    status: u16,
    path: &str,
    retry_after: Option<Duration>,
    body: &[u8],
) -> ClientError {
    let detail = upstream_detail(body);
    match status {
        429 => ClientError::rate_limited(detail, retry_after),
        500..=599 => ClientError::server(
            status,
            format!("Semantic Scholar API is experiencing issues: {detail}"),
            retry_after,
        ),
        400 => ClientError::upstream_client(status, format!("Bad Request (400): {detail}")),
        401 => ClientError::upstream_client(
            status,
            "Authentication failed (401): Invalid or missing API key",
        ),
        403 => ClientError::upstream_client(
            status,
            "Access forbidden (403): API key lacks required permissions",
        ),
        404 => ClientError::upstream_client(status, format!("Resource not found (404): {path}")),
        _ => ClientError::upstream_client(status, format!("HTTP {status}: {detail}")),
    }
}

/// Best-effort message from an error body: JSON `message`/`error` keys, else raw text.
fn upstream_detail(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let parts: Vec<&str> = ["message", "error", "details"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .collect();
        if !parts.is_empty() {
            return parts.join(" - ");
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "no response body".to_string();
    }
    text.chars().take(MAX_MESSAGE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            delay: Duration::from_millis(100),
            max_retry_after: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_retry_budget() {
        let policy = policy();
        let err = ClientError::server(503, "busy", None);
        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 2));
        assert!(!policy.should_retry(&err, 3));
    }

    #[test]
    fn test_non_retryable_errors_never_retry() {
        let err = ClientError::upstream_client(404, "missing");
        assert!(!policy().should_retry(&err, 1));
    }

    #[test]
    fn test_flat_delay_without_hint() {
        let err = ClientError::network("connection refused", false);
        assert_eq!(policy().delay_for(&err), Duration::from_millis(100));
    }

    #[test]
    fn test_hint_overrides_and_is_capped() {
        let err = ClientError::rate_limited("slow", Some(Duration::from_secs(2)));
        assert_eq!(policy().delay_for(&err), Duration::from_secs(2));

        let err = ClientError::rate_limited("slow", Some(Duration::from_secs(3600)));
        assert_eq!(policy().delay_for(&err), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let headers = headers_with_retry_after("7");
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_parse_retry_after_past_date_is_zero() {
        let headers = headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(&headers), Some(Duration::ZERO));
    }

    #[test]
    fn test_parse_retry_after_garbage() {
        assert_eq!(parse_retry_after(&headers_with_retry_after("soon")), None);
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(429, "/p", None, b"Too Many Requests"),
            ClientError::RateLimited { .. }
        ));
        assert!(matches!(
            classify_status(502, "/p", None, b""),
            ClientError::Server { status: 502, .. }
        ));
        let err = classify_status(404, "/graph/v1/paper/nope", None, b"");
        assert!(err.to_string().contains("/graph/v1/paper/nope"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_detail_prefers_json_message() {
        let err = classify_status(400, "/p", None, br#"{"error": "Unrecognized field: foo"}"#);
        assert_eq!(err.to_string(), "Bad Request (400): Unrecognized field: foo");
    }
}
