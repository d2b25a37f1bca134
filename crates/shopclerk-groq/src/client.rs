// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq chat-completions API.
//!
//! Handles request construction, bearer authentication, and transient error
//! retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use shopclerk_core::ClerkError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for Groq API communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    timeout: Duration,
}

impl GroqClient {
    /// Creates a new Groq API client.
    ///
    /// `base_url` is the API origin without a path
    /// (e.g. `https://api.groq.com`); tests point it at a mock server.
    pub fn new(api_key: &str, base_url: impl Into<String>) -> Result<Self, ClerkError> {
        Self::with_timeout(api_key, base_url, REQUEST_TIMEOUT)
    }

    fn with_timeout(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClerkError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ClerkError::Config(format!("invalid API key header value: {e}")))?;
        headers.insert("authorization", bearer);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ClerkError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            max_retries: 1,
            timeout,
        })
    }

    /// Sends a chat-completions request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ClerkError> {
        let url = format!("{}{COMPLETIONS_PATH}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        ClerkError::Timeout {
                            duration: self.timeout,
                        }
                    } else {
                        ClerkError::Provider {
                            message: format!("HTTP request failed: {e}"),
                            source: Some(Box::new(e)),
                        }
                    }
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| ClerkError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| ClerkError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(parsed);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(ClerkError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Groq API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(ClerkError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| ClerkError::Provider {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
