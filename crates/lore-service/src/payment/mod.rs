//! Hosted payment checkout abstractions.
//!
//! This module provides:
//! - [`PaymentProvider`]: core trait for checkout providers
//! - [`PaymentService`]: service wrapper with observability
//! - [`WebhookVerifier`]: `Stripe-Signature` header signing and verification
//!
//! For an HTTP client implementation, see the `lore-reqwest` crate.

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

pub mod event;
pub mod request;
pub mod session;
pub mod signature;

pub use event::{CHECKOUT_SESSION_COMPLETED, PaymentEvent};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MOCK_WEBHOOK_SECRET, MockPaymentProvider};
pub use request::CheckoutRequest;
pub use service::PaymentService;
pub use session::{CheckoutSession, CustomerDetails, PaymentStatus};
pub use signature::{DEFAULT_TOLERANCE, SignatureError, WebhookSignature, WebhookVerifier};

pub use crate::{Error, Result, ServiceHealth};

/// Tracing target for payment operations.
pub const TRACING_TARGET: &str = "lore_service::payment";

/// Core trait for hosted checkout providers.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a checkout session and returns its id and hosted URL.
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Retrieves a checkout session by id.
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession>;

    /// Authenticates a webhook body against its signature header and parses it.
    fn verify_event(&self, payload: &[u8], signature: &str) -> Result<PaymentEvent>;

    /// Checks that the provider is reachable with the configured credentials.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
