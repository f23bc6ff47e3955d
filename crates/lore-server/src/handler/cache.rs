//! Browser cache of the current lore.
//!
//! The preview page stores the lore in two short-lived cookies so a reload
//! does not lose it. Nothing is kept server-side.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use crate::extract::{CookieLore, Json, LoreMeta, cache_cookies};
use crate::handler::request::CacheLore;
use crate::handler::response::{CachedLore, ErrorResponse, LoreCached};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for lore cache operations.
const TRACING_TARGET: &str = "lore_server::handler::cache";

/// Stores the lore and the player profile in cookies.
#[tracing::instrument(skip_all, fields(lore_len = request.lore.len()))]
async fn cache_lore(Json(request): Json<CacheLore>) -> Result<(CookieJar, Json<LoreCached>)> {
    let lore = request.trimmed_lore();
    let meta = LoreMeta {
        pseudo: request.pseudo.clone(),
        genre: request.genre.clone(),
        role: request.role.clone(),
    };

    let jar = cache_cookies(CookieJar::new(), lore, &meta).map_err(|error| {
        ErrorKind::InternalServerError
            .with_message("Failed to cache lore")
            .with_context(error.to_string())
    })?;

    let size = lore.chars().count();
    tracing::debug!(target: TRACING_TARGET, size, "Lore cached");

    Ok((jar, Json(LoreCached { ok: true, size })))
}

fn cache_lore_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Cache lore")
        .description(
            "Stores the lore, cut to 3500 characters, and the player profile in the \
             `lore_cache` and `lore_meta` cookies for 30 minutes.",
        )
        .response::<200, Json<LoreCached>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Restores the lore stored by [`cache_lore`].
#[tracing::instrument(skip_all)]
async fn read_cached_lore(
    CookieLore(cached): CookieLore,
) -> Result<(StatusCode, Json<CachedLore>)> {
    let Some(cached) = cached else {
        tracing::debug!(target: TRACING_TARGET, "No cached lore");
        return Err(ErrorKind::NotFound
            .with_message("No cached lore")
            .with_resource("lore_cache"));
    };

    Ok((StatusCode::OK, Json(cached)))
}

fn read_cached_lore_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Read cached lore")
        .description("Returns the lore and profile stored in the cache cookies.")
        .response::<200, Json<CachedLore>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the lore cache routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/cache-lore",
            post_with(cache_lore, cache_lore_docs).get_with(read_cached_lore, read_cached_lore_docs),
        )
        .with_path_items(|item| item.tag("Lore"))
}

#[cfg(test)]
mod tests {
    use axum::http::header::{COOKIE, SET_COOKIE};
    use serde_json::json;

    use super::*;
    use crate::handler::request::MAX_CACHED_LORE_LEN;
    use crate::handler::test::create_test_server_with_providers;
    use crate::service::MockProviders;

    /// Turns `Set-Cookie` values into a `Cookie` request header.
    fn cookie_header(response: &axum_test::TestResponse) -> String {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[tokio::test]
    async fn cached_lore_round_trips_through_cookies() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({
            "pseudo": "Himmel",
            "genre": "epic",
            "role": "support",
            "lore": "Wolf: Tell me lamb, who is Himmel?",
        });
        let response = server.post("/api/cache-lore").json(&request).await;
        response.assert_status_ok();
        assert_eq!(response.json::<LoreCached>().size, 34);

        let set_cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(set_cookies.len(), 2);
        assert!(set_cookies.iter().all(|c| {
            c.to_str().is_ok_and(|c| {
                c.contains("HttpOnly") && c.contains("SameSite=Lax") && c.contains("Max-Age=1800")
            })
        }));

        let response = server
            .get("/api/cache-lore")
            .add_header(COOKIE, cookie_header(&response))
            .await;
        response.assert_status_ok();

        let cached = response.json::<CachedLore>();
        assert_eq!(cached.lore, "Wolf: Tell me lamb, who is Himmel?");
        assert_eq!(cached.pseudo, "Himmel");
        assert_eq!(cached.role, "support");
        Ok(())
    }

    #[tokio::test]
    async fn long_lore_is_trimmed() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({ "pseudo": "Rowan", "lore": "x".repeat(5000) });
        let response = server.post("/api/cache-lore").json(&request).await;
        response.assert_status_ok();
        assert_eq!(response.json::<LoreCached>().size, MAX_CACHED_LORE_LEN);
        Ok(())
    }

    #[tokio::test]
    async fn nothing_cached_is_not_found() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let response = server.get("/api/cache-lore").await;
        response.assert_status_not_found();

        let response = server
            .get("/api/cache-lore")
            .add_header(COOKIE, "lore_cache=%%%")
            .await;
        response.assert_status_not_found();
        Ok(())
    }
}
