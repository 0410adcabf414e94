//! WhatsApp delivery with exponential-backoff retry.
//!
//! [`WhatsAppGateway`] posts a JSON message to an HTTP gateway (Twilio-style
//! API). Failed attempts are retried up to three times with exponential
//! backoff (1 s, 2 s, 4 s).

use std::time::Duration;

use async_trait::async_trait;

use crate::{Notifier, NotifyError};

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway endpoint and credentials, loaded from the environment.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Message endpoint URL.
    pub api_url: String,
    /// Bearer token for the gateway.
    pub api_token: String,
    /// Sender address (`WHATSAPP_SENDER`), e.g. `whatsapp:+14155238886`.
    pub sender: String,
}

impl WhatsAppConfig {
    /// Load from `WHATSAPP_API_URL`, `WHATSAPP_API_TOKEN`, and
    /// `WHATSAPP_SENDER`. Returns `None` when the URL is unset, which
    /// callers treat as "notifications disabled".
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("WHATSAPP_API_URL").ok()?;
        let api_token = std::env::var("WHATSAPP_API_TOKEN").unwrap_or_default();
        let sender = std::env::var("WHATSAPP_SENDER").unwrap_or_default();
        Some(Self {
            api_url,
            api_token,
            sender,
        })
    }
}

/// Delivers status-change messages to a WhatsApp HTTP gateway.
pub struct WhatsAppGateway {
    client: reqwest::Client,
    config: WhatsAppConfig,
}

impl WhatsAppGateway {
    /// Create a new gateway with a pre-configured HTTP client.
    pub fn new(config: WhatsAppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Deliver one message with retry.
    ///
    /// Retries up to 3 times with exponential backoff before giving up.
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn deliver(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({
            "from": self.config.sender,
            "to": to,
            "body": body,
        });

        let mut last_err: Option<NotifyError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        to,
                        error = %e,
                        "WhatsApp delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(&payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(to, error = %e, "WhatsApp delivery failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WhatsAppGateway {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError> {
        self.deliver(address, message).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WhatsAppConfig {
        WhatsAppConfig {
            api_url: "http://localhost:9/messages".to_string(),
            api_token: "token".to_string(),
            sender: "whatsapp:+14155238886".to_string(),
        }
    }

    #[test]
    fn new_does_not_panic() {
        let _gateway = WhatsAppGateway::new(test_config());
    }

    #[test]
    fn notify_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = NotifyError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
