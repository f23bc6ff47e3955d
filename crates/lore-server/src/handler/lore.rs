//! Lore generation.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use lore_service::CompletionService;

use crate::extract::{Json, ValidateJson};
use crate::handler::request::GenerateLore;
use crate::handler::response::{ErrorResponse, GeneratedLore};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for lore generation.
const TRACING_TARGET: &str = "lore_server::handler::lore";

/// Asks the completion provider for a Wolf and Lamb dialogue about the player.
#[tracing::instrument(skip_all, fields(pseudo = %request.pseudo))]
async fn generate_lore(
    State(completion): State<CompletionService>,
    ValidateJson(request): ValidateJson<GenerateLore>,
) -> Result<(StatusCode, Json<GeneratedLore>)> {
    tracing::debug!(target: TRACING_TARGET, "Generating lore");

    let response = completion
        .complete(&request.into_prompt().into_request())
        .await?;

    let Some(lore) = response.text() else {
        tracing::warn!(
            target: TRACING_TARGET,
            request_id = %response.request_id,
            finish_reason = ?response.finish_reason,
            "Completion returned no text"
        );
        return Err(ErrorKind::BadGateway.with_message("Failed to generate lore"));
    };

    tracing::info!(
        target: TRACING_TARGET,
        lore_len = lore.chars().count(),
        "Lore generated"
    );

    let lore = GeneratedLore {
        lore: lore.to_owned(),
    };
    Ok((StatusCode::OK, Json(lore)))
}

fn generate_lore_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Generate lore")
        .description(
            "Generates a short Wolf and Lamb dialogue about the player, drawing allies \
             and enemies from League of Legends.",
        )
        .response::<200, Json<GeneratedLore>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<502, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the lore generation route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/generate-lore",
            post_with(generate_lore, generate_lore_docs),
        )
        .with_path_items(|item| item.tag("Lore"))
}

#[cfg(test)]
mod tests {
    use lore_service::MockCompletionProvider;
    use lore_service::completion::{MOCK_LORE, MessageRole};
    use serde_json::json;

    use super::*;
    use crate::handler::test::create_test_server_with_providers;
    use crate::service::MockProviders;

    #[tokio::test]
    async fn generates_lore() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({ "pseudo": "Clovix", "genre": "horror", "role": "jungle" });
        let response = server.post("/api/generate-lore").json(&request).await;
        response.assert_status_ok();

        let body = response.json::<GeneratedLore>();
        assert_eq!(body.lore, MOCK_LORE);

        let requests = providers.completion.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, MessageRole::User);
        assert!(
            requests[0].messages[0]
                .content
                .contains("Tell me lamb, who is Clovix?")
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_completion_is_bad_gateway() -> anyhow::Result<()> {
        let providers = MockProviders::default().with_completion(MockCompletionProvider::empty());
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({ "pseudo": "Clovix" });
        let response = server.post("/api/generate-lore").json(&request).await;
        response.assert_status(StatusCode::BAD_GATEWAY);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["message"], "Failed to generate lore");
        Ok(())
    }

    #[tokio::test]
    async fn missing_pseudo_is_rejected() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({ "pseudo": "", "genre": "epic" });
        let response = server.post("/api/generate-lore").json(&request).await;
        response.assert_status_bad_request();
        assert!(providers.completion.requests().await.is_empty());
        Ok(())
    }
}
