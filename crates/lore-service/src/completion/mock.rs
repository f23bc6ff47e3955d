//! Canned completion provider for testing.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{CompletionProvider, CompletionRequest, CompletionResponse, Result, ServiceHealth};

/// Dialogue returned by [`MockCompletionProvider::default`].
pub const MOCK_LORE: &str = "Wolf: Tell me lamb, who is this wanderer? The Tidebreaker, some say.\n\
                             Lamb: One who walks where Nautilus sleeps, little wolf.";

/// Mock completion provider returning a fixed answer.
#[derive(Clone, Debug)]
pub struct MockCompletionProvider {
    content: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::with_response(MOCK_LORE)
    }
}

impl MockCompletionProvider {
    /// Answers every request with `content`.
    pub fn with_response(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            requests: Arc::default(),
        }
    }

    /// Answers every request without content.
    pub fn empty() -> Self {
        Self {
            content: None,
            requests: Arc::default(),
        }
    }

    /// Returns every request received so far.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().await.push(request.clone());

        let response = CompletionResponse::new(request.request_id, self.content.clone())
            .with_model(request.model.as_deref().unwrap_or("mock"))
            .with_finish_reason("stop");
        Ok(response)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
