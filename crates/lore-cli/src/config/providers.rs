//! Provider client configuration.
//!
//! Every outbound client shares one [`ReqwestConfig`]; the credentials of
//! each provider come from its own `lore-reqwest` config group.

use clap::Args;
use lore_reqwest::{
    MailApiClient, MailApiConfig, OpenAiClient, OpenAiConfig, ReqwestConfig, StripeClient,
    StripeConfig,
};
use lore_service::{CompletionService, MailService, PaymentService};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Credentials and endpoints of the external providers.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Outbound HTTP client settings.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// Stripe account used for checkout sessions and webhooks.
    #[clap(flatten)]
    pub stripe: StripeConfig,

    /// OpenAI-compatible completion API used to write the lore.
    #[clap(flatten)]
    pub openai: OpenAiConfig,

    /// HTTP mail API used for purchase notifications.
    #[clap(flatten)]
    pub mail: MailApiConfig,
}

/// Provider services built once at startup.
#[derive(Debug, Clone)]
pub struct Providers {
    pub payment: PaymentService,
    pub mail: MailService,
    pub completion: CompletionService,
}

impl ProviderConfig {
    /// Checks every provider config without building a client.
    pub fn validate(&self) -> lore_reqwest::Result<()> {
        self.stripe.validate()?;
        self.openai.validate()?;
        self.mail.validate()?;
        Ok(())
    }

    /// Creates the payment, completion and mail services.
    ///
    /// # Errors
    ///
    /// Returns an error if a config is invalid or an HTTP client cannot be
    /// built.
    pub fn create_services(&self) -> lore_reqwest::Result<Providers> {
        let payment = StripeClient::new(self.stripe.clone(), &self.http)?.into_service();
        let completion = OpenAiClient::new(self.openai.clone(), &self.http)?.into_service();
        let mail = MailApiClient::new(self.mail.clone(), &self.http)?.into_service();

        Ok(Providers {
            payment,
            mail,
            completion,
        })
    }

    /// Logs provider endpoints (no secrets).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            stripe_api_url = %self.stripe.api_url,
            stripe_test_mode = self.stripe.is_test_mode(),
            openai_api_url = %self.openai.api_url,
            openai_model = %self.openai.model,
            mail_api_url = %self.mail.api_url,
            http_timeout_secs = self.http.http_timeout,
            "Provider configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            http: ReqwestConfig::default(),
            stripe: StripeConfig::new("sk_test_123", "whsec_123"),
            openai: OpenAiConfig::new("sk-test"),
            mail: MailApiConfig::new("re_test"),
        }
    }

    #[test]
    fn builds_all_services() -> anyhow::Result<()> {
        let config = config();
        config.validate()?;
        config.create_services()?;
        Ok(())
    }

    #[test]
    fn rejects_blank_stripe_key() {
        let mut config = config();
        config.stripe.secret_key = String::new();
        assert!(config.validate().is_err());
        assert!(config.create_services().is_err());
    }
}
