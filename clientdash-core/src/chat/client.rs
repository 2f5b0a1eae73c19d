//! HTTP client for the chat webhook
//!
//! One POST per message, no streaming, no retries. Every exchange ends in a
//! [`ChatOutcome`]; transport problems are folded into it rather than
//! returned as errors.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use crate::config::ChatConfig;
use crate::error::{Error, Result};

use super::reply::ChatOutcome;

/// Request body for the webhook POST
#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    message: &'a str,
    /// ISO-8601 with millisecond precision and a `Z` suffix
    timestamp: String,
}

/// HTTP client for the chat webhook
#[derive(Debug, Clone)]
pub struct WebhookClient {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookClient {
    /// Create a webhook client from configuration.
    ///
    /// Returns an error only for invalid configuration.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Chat(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: config.webhook_url.trim().to_string(),
            http_client,
        })
    }

    /// Webhook endpoint
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one user message and wait for the reply.
    pub async fn send(&self, message: &str, sent_at: DateTime<Utc>) -> ChatOutcome {
        let request = WebhookRequest {
            message,
            timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let response = match self.http_client.post(&self.url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Chat webhook request failed");
                return ChatOutcome::ConnectFailed {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Chat webhook returned non-success status");
            return ChatOutcome::Rejected {
                status: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(body) => {
                tracing::debug!(bytes = body.len(), "Chat webhook replied");
                ChatOutcome::from_response(status.as_u16(), &body)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read chat webhook body");
                ChatOutcome::ConnectFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_client_requires_valid_config() {
        let config = ChatConfig {
            webhook_url: String::new(),
            timeout_secs: None,
        };
        assert!(WebhookClient::new(&config).is_err());
    }

    #[test]
    fn test_client_with_default_config() {
        let client = WebhookClient::new(&ChatConfig::default()).unwrap();
        assert!(client.url().starts_with("https://"));
    }

    #[test]
    fn test_request_body_shape() {
        let sent_at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let request = WebhookRequest {
            message: "hello",
            timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "hello",
                "timestamp": "2025-03-14T09:26:53.000Z",
            })
        );
    }
}
