//! HTTP mail API [`MailProvider`].

use std::sync::Arc;

use lore_service::ServiceHealth;
use lore_service::mail::{MailMessage, MailProvider, MailReceipt, MailService};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::MailApiConfig;
use crate::{Error, ReqwestConfig, Result};

/// Tracing target for mail client operations.
pub const TRACING_TARGET: &str = "lore_reqwest::mail";

const PROVIDER: &str = "mail";

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

impl<'a> From<&'a MailMessage> for SendBody<'a> {
    fn from(message: &'a MailMessage) -> Self {
        Self {
            from: &message.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SendReply {
    #[serde(default)]
    id: Option<String>,
}

struct MailApiClientInner {
    http: Client,
    config: MailApiConfig,
}

/// Mail delivery over an HTTP API.
#[derive(Clone)]
pub struct MailApiClient {
    inner: Arc<MailApiClientInner>,
}

impl std::fmt::Debug for MailApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailApiClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl MailApiClient {
    pub fn new(config: MailApiConfig, http: &ReqwestConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            "Creating mail client"
        );

        let inner = MailApiClientInner {
            http: http.build_client()?,
            config,
        };

        tracing::info!(target: TRACING_TARGET, "Mail client created successfully");

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Converts this client into a [`MailService`].
    pub fn into_service(self) -> MailService {
        MailService::from_provider(self)
    }

    async fn post(&self, message: &MailMessage) -> Result<MailReceipt> {
        let response = self
            .inner
            .http
            .post(&self.inner.config.api_url)
            .bearer_auth(&self.inner.config.api_key)
            .header("Idempotency-Key", message.message_id.to_string())
            .json(&SendBody::from(message))
            .send()
            .await?;

        let response = Error::check(PROVIDER, response).await?;
        let body = response.text().await?;
        let reply: SendReply = serde_json::from_str(&body).unwrap_or_default();

        Ok(MailReceipt {
            provider_id: reply.id,
        })
    }
}

#[async_trait::async_trait]
impl MailProvider for MailApiClient {
    async fn send(&self, message: &MailMessage) -> lore_service::Result<MailReceipt> {
        Ok(self.post(message).await?)
    }

    /// Mail APIs expose no common status endpoint; a validated configuration
    /// is reported as healthy.
    async fn health_check(&self) -> lore_service::Result<ServiceHealth> {
        Ok(ServiceHealth::healthy()
            .with_metric("api_url", self.inner.config.api_url.clone().into()))
    }
}
