//! Featured champions.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::Champions;
use crate::service::{Gallery, ServiceState};

/// Lists the featured champions in display order.
#[tracing::instrument(skip_all)]
async fn list_champions(State(gallery): State<Gallery>) -> Result<(StatusCode, Json<Champions>)> {
    Ok((StatusCode::OK, Json(gallery.champions().to_vec())))
}

fn list_champions_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List featured champions")
        .description("Returns the champions shown on the gallery page with their portrait paths.")
        .response::<200, Json<Champions>>()
}

/// Returns a [`Router`] with the gallery route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/gallery", get_with(list_champions, list_champions_docs))
        .with_path_items(|item| item.tag("Gallery"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server_with_providers;
    use crate::service::MockProviders;

    #[tokio::test]
    async fn lists_featured_champions() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let response = server.get("/api/gallery").await;
        response.assert_status_ok();

        let champions = response.json::<Champions>();
        assert_eq!(champions.len(), 7);
        assert_eq!(champions[0].name, "Leviathan");
        assert!(champions.iter().all(|c| c.image.starts_with("/champions/")));
        Ok(())
    }
}
