//! Chat completion abstractions and the lore prompt.
//!
//! - [`CompletionProvider`]: core trait for chat completion backends
//! - [`CompletionService`]: service wrapper with observability
//! - [`LorePrompt`]: the Wolf and Lamb dialogue instruction
//!
//! # Example
//!
//! ```rust,ignore
//! use lore_service::completion::{CompletionService, LorePrompt};
//!
//! let service = CompletionService::from_provider(my_provider);
//! let request = LorePrompt::new("Himmel", "epic", "support").into_request();
//! let lore = service.complete(&request).await?.text();
//! ```

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

pub mod prompt;
pub mod request;
pub mod response;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MOCK_LORE, MockCompletionProvider};
pub use prompt::LorePrompt;
pub use request::{ChatMessage, CompletionRequest, MessageRole};
pub use response::CompletionResponse;
pub use service::CompletionService;

pub use crate::{Error, Result, ServiceHealth};

/// Tracing target for completion operations.
pub const TRACING_TARGET: &str = "lore_service::completion";

/// Core trait for chat completion backends.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Runs a chat completion and returns the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    async fn health_check(&self) -> Result<ServiceHealth>;
}
