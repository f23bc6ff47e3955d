//! Recording mail provider for testing.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{MailMessage, MailProvider, MailReceipt, Result, ServiceHealth};
use crate::Error;

/// Mock mail provider that keeps every message it is asked to send.
///
/// Recipients listed with [`MockMailProvider::reject`] fail with a
/// service-unavailable error instead.
#[derive(Clone, Debug, Default)]
pub struct MockMailProvider {
    outbox: Arc<Mutex<Vec<MailMessage>>>,
    rejected: Arc<Mutex<Vec<String>>>,
}

impl MockMailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes delivery to `address` fail.
    pub async fn reject(&self, address: impl Into<String>) {
        self.rejected.lock().await.push(address.into());
    }

    /// Returns the messages delivered so far.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl MailProvider for MockMailProvider {
    async fn send(&self, message: &MailMessage) -> Result<MailReceipt> {
        if self.rejected.lock().await.contains(&message.to) {
            return Err(Error::service_unavailable()
                .with_message(format!("mailbox {} rejected the message", message.to)));
        }

        self.outbox.lock().await.push(message.clone());
        Ok(MailReceipt {
            provider_id: Some(message.message_id.to_string()),
        })
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
