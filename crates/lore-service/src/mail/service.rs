//! Mail service wrapper with observability.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;

use super::{MailMessage, MailProvider, MailReceipt, Result, ServiceHealth, TRACING_TARGET};

/// Mail service wrapper with observability.
#[derive(Clone)]
pub struct MailService {
    provider: Arc<dyn MailProvider>,
}

impl fmt::Debug for MailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailService").finish_non_exhaustive()
    }
}

impl MailService {
    /// Create a new mail service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: MailProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock() -> Self {
        Self::from_provider(super::MockMailProvider::default())
    }

    /// Sends a message.
    pub async fn send(&self, message: &MailMessage) -> Result<MailReceipt> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            message_id = %message.message_id,
            subject = %message.subject,
            text_len = message.text.len(),
            "Sending mail"
        );

        let result = self.provider.send(message).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(receipt) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    message_id = %message.message_id,
                    provider_id = ?receipt.provider_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Mail sent"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    message_id = %message.message_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Mail delivery failed"
                );
            }
        }

        result
    }

    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}
