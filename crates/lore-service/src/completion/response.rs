//! Chat completion response.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First choice of a chat completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Identifier of the request this answers.
    pub request_id: Uuid,
    /// Generated content; absent when the backend returned no choice.
    pub content: Option<String>,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
}

impl CompletionResponse {
    pub fn new(request_id: Uuid, content: Option<String>) -> Self {
        Self {
            request_id,
            content,
            model: None,
            finish_reason: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_finish_reason(mut self, finish_reason: impl Into<String>) -> Self {
        self.finish_reason = Some(finish_reason.into());
        self
    }

    /// Returns the content if it is not blank.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
    }
}
