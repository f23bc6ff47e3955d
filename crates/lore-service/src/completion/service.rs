//! Completion service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    CompletionProvider, CompletionRequest, CompletionResponse, Result, ServiceHealth,
    TRACING_TARGET,
};

/// Completion service wrapper with observability.
///
/// This service wraps any provider implementing [`CompletionProvider`] and
/// logs request sizes, latency and outcome.
#[derive(Clone)]
pub struct CompletionService {
    provider: Arc<dyn CompletionProvider>,
}

impl fmt::Debug for CompletionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionService").finish_non_exhaustive()
    }
}

impl CompletionService {
    /// Create a new completion service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock() -> Self {
        Self::from_provider(super::MockCompletionProvider::default())
    }

    /// Runs a chat completion.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            messages = request.messages.len(),
            model = ?request.model,
            "Processing completion request"
        );

        let result = self.provider.complete(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    model = ?response.model,
                    finish_reason = ?response.finish_reason,
                    content_len = response.content.as_deref().map_or(0, str::len),
                    elapsed_ms = elapsed.as_millis(),
                    "Completion successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Completion failed"
                );
            }
        }

        result
    }

    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}
