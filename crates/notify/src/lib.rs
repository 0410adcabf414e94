//! Outbound notification channels.
//!
//! The platform notifies requesters about status changes over WhatsApp.
//! Dispatch is fire-and-forget from the caller's perspective: a failed
//! send is logged and never fails the triggering operation.
//!
//! - [`Notifier`] is the send seam, so orchestration code and tests do
//!   not depend on a live gateway.
//! - [`WhatsAppGateway`] is the HTTP implementation with timeout and retry.
//! - [`NullNotifier`] is a no-op implementation for setups without a
//!   configured gateway.

pub mod whatsapp;

pub use whatsapp::{WhatsAppConfig, WhatsAppGateway};

use async_trait::async_trait;

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Notification gateway returned HTTP {0}")]
    HttpStatus(u16),
}

/// A channel that can deliver one message to one address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError>;
}

/// Discards every message. Used when no gateway is configured so the rest
/// of the pipeline behaves identically in development.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, address: &str, _message: &str) -> Result<(), NotifyError> {
        tracing::debug!(address, "Notification gateway disabled, dropping message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_notifier_always_succeeds() {
        let notifier = NullNotifier;
        assert!(notifier.send("+5511999999999", "olá").await.is_ok());
    }

    #[test]
    fn notify_error_display_http_status() {
        let err = NotifyError::HttpStatus(503);
        assert_eq!(err.to_string(), "Notification gateway returned HTTP 503");
    }
}
