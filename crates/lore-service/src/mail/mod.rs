//! Plain-text mail delivery.

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

pub mod message;

pub use message::{MailMessage, MailReceipt};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::MockMailProvider;
pub use service::MailService;

pub use crate::{Error, Result, ServiceHealth};

/// Tracing target for mail operations.
pub const TRACING_TARGET: &str = "lore_service::mail";

/// Core trait for mail delivery providers.
#[async_trait::async_trait]
pub trait MailProvider: Send + Sync {
    /// Sends a single message.
    async fn send(&self, message: &MailMessage) -> Result<MailReceipt>;

    async fn health_check(&self) -> Result<ServiceHealth>;
}
