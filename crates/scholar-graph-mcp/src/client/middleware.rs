//! Middleware for the HTTP client.
//!
//! Every attempt made by the retry loop passes through here, so each one shows
//! up in the logs with its own status and latency.

use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs method, path, status and latency of every upstream attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracing;

#[async_trait::async_trait]
impl Middleware for RequestTracing {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let path = req.url().path().to_string();
        tracing::debug!(
            %method,
            %path,
            query = req.url().query().unwrap_or_default(),
            "Sending upstream request"
        );

        let started = Instant::now();
        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed_ms,
                "Upstream response"
            ),
            Err(e) => {
                tracing::warn!(%method, %path, elapsed_ms, error = %e, "Upstream request failed");
            }
        }

        result
    }
}
