//! Concurrent fetch client with per-URL retry.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryPolicy;

/// Issues GET requests over a shared transport, retrying each URL
/// independently according to the configured [`RetryPolicy`].
pub struct FetchClient {
    http: Arc<dyn HttpClient>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl FetchClient {
    pub fn new(retry: RetryPolicy, timeout: Duration) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), retry, timeout)
    }

    pub fn with_http_client(
        http: Arc<dyn HttpClient>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            retry,
            timeout,
        }
    }

    /// Fetches one URL and parses the body as JSON, retrying retryable
    /// failures until the policy's attempt budget runs out.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, ApiError> {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let error = match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !self.retry.should_retry(&error) {
                return Err(error);
            }
            if !self.retry.allows_another(attempts) {
                return Err(ApiError::RetriesExhausted {
                    attempts,
                    last: error.to_string(),
                });
            }

            let delay = self.retry.delay_for_attempt(attempts - 1);
            warn!(
                url,
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "upstream request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Issues one request per URL concurrently over the shared transport.
    ///
    /// The returned vector has exactly one entry per input URL, in input
    /// order regardless of completion order; a failing entry never blocks
    /// its siblings.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<Result<Value, ApiError>> {
        join_all(urls.iter().map(|url| self.fetch_json(url))).await
    }

    async fn attempt(&self, url: &str) -> Result<Value, ApiError> {
        let request = HttpRequest::get(url).with_timeout(self.timeout);
        let response = self.http.get(request).await?;

        if !response.is_success() {
            return Err(ApiError::UpstreamStatus {
                status: response.status,
                url: url.to_owned(),
            });
        }

        let value: Value = serde_json::from_str(&response.body)?;

        // The API reports free-tier throttling inside a 200 body.
        if let Some(note) = rate_limit_note(&value) {
            return Err(ApiError::RateLimited { note });
        }
        if let Some(message) = value.get("Error Message").and_then(Value::as_str) {
            return Err(ApiError::Malformed {
                reason: message.to_owned(),
            });
        }

        Ok(value)
    }
}

fn rate_limit_note(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    ["Note", "Information"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
