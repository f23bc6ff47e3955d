//! In-memory payment provider for testing.
//!
//! Sessions live in a map behind a lock. Webhook bodies are verified with
//! the same [`WebhookVerifier`] the tests sign them with.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CheckoutRequest, CheckoutSession, PaymentEvent, PaymentProvider, PaymentStatus, Result,
    ServiceHealth, WebhookVerifier,
};
use crate::Error;

/// Webhook secret used by [`MockPaymentProvider::default`].
pub const MOCK_WEBHOOK_SECRET: &str = "whsec_mock";

/// Mock payment provider.
#[derive(Clone, Debug)]
pub struct MockPaymentProvider {
    verifier: WebhookVerifier,
    sessions: Arc<RwLock<HashMap<String, CheckoutSession>>>,
    requests: Arc<RwLock<Vec<CheckoutRequest>>>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new(WebhookVerifier::new(MOCK_WEBHOOK_SECRET))
    }
}

impl MockPaymentProvider {
    pub fn new(verifier: WebhookVerifier) -> Self {
        Self {
            verifier,
            sessions: Arc::default(),
            requests: Arc::default(),
        }
    }

    /// Returns the verifier, for signing test payloads.
    pub fn verifier(&self) -> &WebhookVerifier {
        &self.verifier
    }

    /// Stores a session so later lookups find it.
    pub async fn insert_session(&self, session: CheckoutSession) {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
    }

    /// Marks a stored session as paid by `email`.
    pub async fn complete_session(&self, session_id: &str, email: Option<&str>) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::not_found().with_message(session_id.to_owned()))?;
        session.payment_status = PaymentStatus::Paid;
        session.customer_details = Some(super::CustomerDetails {
            email: email.map(str::to_owned),
            name: None,
        });
        Ok(())
    }

    /// Returns every checkout request received so far.
    pub async fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let id = format!("cs_test_{}", Uuid::new_v4().simple());
        let session = CheckoutSession {
            url: Some(format!("https://checkout.stripe.com/c/pay/{id}")),
            id,
            metadata: request.metadata.clone().into_iter().collect(),
            ..Default::default()
        };

        self.requests.write().await.push(request.clone());
        self.insert_session(session.clone()).await;
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                Error::not_found().with_message(format!("No such checkout session: {session_id}"))
            })
    }

    fn verify_event(&self, payload: &[u8], signature: &str) -> Result<PaymentEvent> {
        self.verifier.verify(payload, signature)?;
        Ok(serde_json::from_slice(payload)?)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentService;

    #[tokio::test]
    async fn created_sessions_can_be_retrieved() -> anyhow::Result<()> {
        let provider = MockPaymentProvider::default();
        let service = PaymentService::from_provider(provider.clone());

        let request = CheckoutRequest::new("price_1", "https://x/success", "https://x/")
            .with_metadata("pseudo", "Leviathan");
        let session = service.create_checkout_session(&request).await?;
        assert!(session.url.is_some());

        provider
            .complete_session(&session.id, Some("buyer@example.com"))
            .await?;
        let paid = service.retrieve_session(&session.id).await?;
        assert!(paid.is_paid());
        assert_eq!(paid.metadata_value("pseudo"), Some("Leviathan"));
        assert_eq!(provider.requests().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let service = PaymentService::mock();
        let error = service.retrieve_session("cs_missing").await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::NotFound);
    }

    #[test]
    fn verifies_signed_events() -> anyhow::Result<()> {
        let provider = MockPaymentProvider::default();
        let body = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;
        let header = provider
            .verifier()
            .header(jiff::Timestamp::now().as_second(), body)?;

        let event = provider.verify_event(body, &header)?;
        assert!(event.is_checkout_completed());

        let error = provider.verify_event(body, "t=1,v1=00").unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Authentication);
        Ok(())
    }
}
