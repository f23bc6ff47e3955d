//! Stripe-backed [`PaymentProvider`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use lore_service::payment::{
    CheckoutRequest, CheckoutSession, PaymentEvent, PaymentProvider, PaymentService,
    WebhookVerifier,
};
use lore_service::ServiceHealth;
use reqwest::Client;

use super::StripeConfig;
use super::form::checkout_form;
use crate::{Error, ReqwestConfig, Result};

/// Tracing target for Stripe client operations.
pub const TRACING_TARGET: &str = "lore_reqwest::stripe";

const PROVIDER: &str = "stripe";

struct StripeClientInner {
    http: Client,
    config: StripeConfig,
    verifier: WebhookVerifier,
}

/// Stripe REST client.
///
/// Creates and retrieves checkout sessions and verifies webhook events with
/// the endpoint signing secret.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Creates a new client after validating `config`.
    pub fn new(config: StripeConfig, http: &ReqwestConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            test_mode = config.is_test_mode(),
            timeout_ms = http.effective_timeout().as_millis(),
            "Creating Stripe client"
        );

        let verifier = WebhookVerifier::new(config.webhook_secret.clone())
            .with_tolerance(Duration::from_secs(config.webhook_tolerance));
        let inner = StripeClientInner {
            http: http.build_client()?,
            config,
            verifier,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Stripe client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.inner.config
    }

    /// Converts this client into a [`PaymentService`].
    pub fn into_service(self) -> PaymentService {
        PaymentService::from_provider(self)
    }

    async fn post_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let response = self
            .inner
            .http
            .post(self.inner.config.endpoint(&["checkout", "sessions"])?)
            .bearer_auth(&self.inner.config.secret_key)
            .header("Idempotency-Key", request.request_id.to_string())
            .form(&checkout_form(request))
            .send()
            .await?;

        let response = Error::check(PROVIDER, response).await?;
        Ok(response.json().await?)
    }

    async fn get_session(&self, session_id: &str) -> Result<CheckoutSession> {
        let url = self
            .inner
            .config
            .endpoint(&["checkout", "sessions", session_id])?;
        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(&self.inner.config.secret_key)
            .send()
            .await?;

        let response = Error::check(PROVIDER, response).await?;
        Ok(response.json().await?)
    }

    async fn get_balance(&self) -> Result<()> {
        let response = self
            .inner
            .http
            .get(self.inner.config.endpoint(&["balance"])?)
            .bearer_auth(&self.inner.config.secret_key)
            .send()
            .await?;

        Error::check(PROVIDER, response).await?;
        Ok(())
    }
}

/// Session ids are opaque `[A-Za-z0-9_]` tokens; anything else never
/// reaches the URL path.
fn is_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

#[async_trait::async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> lore_service::Result<CheckoutSession> {
        Ok(self.post_checkout(request).await?)
    }

    async fn retrieve_session(&self, session_id: &str) -> lore_service::Result<CheckoutSession> {
        if !is_session_id(session_id) {
            return Err(lore_service::Error::invalid_input()
                .with_message(format!("Malformed checkout session id: {session_id}")));
        }

        Ok(self.get_session(session_id).await?)
    }

    fn verify_event(&self, payload: &[u8], signature: &str) -> lore_service::Result<PaymentEvent> {
        self.inner.verifier.verify(payload, signature)?;
        let event = serde_json::from_slice(payload).map_err(Error::from)?;
        Ok(event)
    }

    async fn health_check(&self) -> lore_service::Result<ServiceHealth> {
        let started_at = Instant::now();
        let health = match self.get_balance().await {
            Ok(()) => ServiceHealth::healthy(),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Stripe health check failed"
                );
                ServiceHealth::unhealthy(error.to_string())
            }
        };

        Ok(health
            .with_response_time(started_at.elapsed())
            .with_metric("test_mode", self.inner.config.is_test_mode().into()))
    }
}

#[cfg(test)]
mod tests {
    use lore_service::ErrorKind;

    use super::*;

    fn client() -> anyhow::Result<StripeClient> {
        let config = StripeConfig::new("sk_test_123", "whsec_test");
        Ok(StripeClient::new(config, &ReqwestConfig::default())?)
    }

    #[test]
    fn client_creation() -> anyhow::Result<()> {
        let client = client()?;
        assert!(client.config().is_test_mode());
        assert!(!format!("{client:?}").contains("sk_test_123"));
        Ok(())
    }

    #[test]
    fn rejects_invalid_config() {
        let config = StripeConfig::new("", "whsec_test");
        assert!(StripeClient::new(config, &ReqwestConfig::default()).is_err());
    }

    #[test]
    fn verifies_signed_events() -> anyhow::Result<()> {
        let client = client()?;
        let body = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_test_1","metadata":{"lore_1":"Tell me lamb"}}}}"#;
        let header = WebhookVerifier::new("whsec_test")
            .header(jiff::Timestamp::now().as_second(), body)?;

        let event = client.verify_event(body, &header)?;
        assert!(event.is_checkout_completed());
        assert_eq!(
            event.checkout_session()?.metadata_value("lore_1"),
            Some("Tell me lamb")
        );

        let forged = WebhookVerifier::new("whsec_other")
            .header(jiff::Timestamp::now().as_second(), body)?;
        let error = client.verify_event(body, &forged).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authentication);
        Ok(())
    }

    #[tokio::test]
    async fn refuses_malformed_session_ids() -> anyhow::Result<()> {
        let client = client()?;
        let error = client.retrieve_session("../balance").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(is_session_id("cs_test_a1B2"));
        Ok(())
    }
}
