//! OpenAI-backed [`CompletionProvider`].

use std::sync::Arc;
use std::time::Instant;

use lore_service::ServiceHealth;
use lore_service::completion::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionService,
};
use reqwest::Client;

use super::OpenAiConfig;
use super::wire::{ChatCompletionBody, ChatCompletionReply};
use crate::{Error, ReqwestConfig, Result};

/// Tracing target for OpenAI client operations.
pub const TRACING_TARGET: &str = "lore_reqwest::openai";

const PROVIDER: &str = "openai";

struct OpenAiClientInner {
    http: Client,
    config: OpenAiConfig,
}

/// Chat completions client for OpenAI and compatible APIs.
#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig, http: &ReqwestConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            model = %config.model,
            "Creating OpenAI client"
        );

        let inner = OpenAiClientInner {
            http: http.build_client()?,
            config,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "OpenAI client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.inner.config
    }

    /// Converts this client into a [`CompletionService`].
    pub fn into_service(self) -> CompletionService {
        CompletionService::from_provider(self)
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let config = &self.inner.config;
        let body = ChatCompletionBody {
            model: request.model.as_deref().unwrap_or(&config.model),
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(config.temperature),
        };

        let response = self
            .inner
            .http
            .post(config.endpoint("chat/completions"))
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await?;

        let reply: ChatCompletionReply = Error::check(PROVIDER, response).await?.json().await?;
        let model = reply.model.clone();
        let (content, finish_reason) = reply.into_first();

        let mut response = CompletionResponse::new(request.request_id, content);
        response.model = model;
        response.finish_reason = finish_reason;
        Ok(response)
    }

    async fn list_models(&self) -> Result<()> {
        let response = self
            .inner
            .http
            .get(self.inner.config.endpoint("models"))
            .bearer_auth(&self.inner.config.api_key)
            .send()
            .await?;

        Error::check(PROVIDER, response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> lore_service::Result<CompletionResponse> {
        Ok(self.chat(request).await?)
    }

    async fn health_check(&self) -> lore_service::Result<ServiceHealth> {
        let started_at = Instant::now();
        let health = match self.list_models().await {
            Ok(()) => ServiceHealth::healthy(),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "OpenAI health check failed"
                );
                ServiceHealth::unhealthy(error.to_string())
            }
        };

        Ok(health.with_response_time(started_at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() -> anyhow::Result<()> {
        let client = OpenAiClient::new(OpenAiConfig::new("sk-test"), &ReqwestConfig::default())?;
        assert_eq!(client.config().model, "gpt-4o");
        assert!(!format!("{client:?}").contains("sk-test"));
        Ok(())
    }

    #[test]
    fn rejects_missing_key() {
        let result = OpenAiClient::new(OpenAiConfig::new(""), &ReqwestConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
