//! Payment service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    CheckoutRequest, CheckoutSession, PaymentEvent, PaymentProvider, Result, ServiceHealth,
    TRACING_TARGET,
};

/// Payment service wrapper with observability.
///
/// Adds structured logging to any [`PaymentProvider`]. The provider is
/// wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
}

impl fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentService").finish_non_exhaustive()
    }
}

impl PaymentService {
    /// Create a new payment service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: PaymentProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a service backed by an in-memory mock provider.
    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock() -> Self {
        Self::from_provider(super::MockPaymentProvider::default())
    }

    /// Creates a hosted checkout session.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            price_id = %request.price_id,
            metadata_keys = request.metadata.len(),
            "Creating checkout session"
        );

        let result = self.provider.create_checkout_session(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(session) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    session_id = %session.id,
                    elapsed_ms = elapsed.as_millis(),
                    "Checkout session created"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Checkout session creation failed"
                );
            }
        }

        result
    }

    /// Retrieves a checkout session by id.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            session_id = %session_id,
            "Retrieving checkout session"
        );

        let result = self.provider.retrieve_session(session_id).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(session) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    payment_status = ?session.payment_status,
                    metadata_keys = session.metadata.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Checkout session retrieved"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Checkout session retrieval failed"
                );
            }
        }

        result
    }

    /// Authenticates and parses a webhook body.
    pub fn verify_event(&self, payload: &[u8], signature: &str) -> Result<PaymentEvent> {
        let result = self.provider.verify_event(payload, signature);

        match &result {
            Ok(event) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    event_id = %event.id,
                    event_type = %event.kind,
                    "Webhook event verified"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    payload_len = payload.len(),
                    error = %error,
                    "Webhook event rejected"
                );
            }
        }

        result
    }

    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}
