//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use lore_server::handler::routes;
//! use lore_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use lore_server::service::ServiceState;
//!
//! fn app(state: ServiceState) -> axum::Router {
//!     routes()
//!         .with_open_api(OpenApiConfig::default())
//!         .with_state(state)
//! }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod cache;
mod checkout;
mod error;
mod fulfillment;
mod gallery;
mod lore;
mod monitors;
pub mod request;
pub mod response;
mod webhooks;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(lore::routes())
        .merge(cache::routes())
        .merge(checkout::routes())
        .merge(webhooks::routes())
        .merge(fulfillment::routes())
        .merge(gallery::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use aide::axum::ApiRouter;
    use aide::openapi::OpenApi;
    use axum_test::TestServer;

    use crate::handler::routes;
    use crate::service::{MockProviders, ServiceConfig, ServiceState};

    /// Returns a new [`TestServer`] over `providers` with the given router.
    pub fn create_test_server_with_providers(
        router: impl Fn(ServiceState) -> ApiRouter<ServiceState>,
        providers: &MockProviders,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_config(router, providers, MockProviders::config())
    }

    /// Returns a new [`TestServer`] over `providers` configured with `config`.
    pub fn create_test_server_with_config(
        router: impl Fn(ServiceState) -> ApiRouter<ServiceState>,
        providers: &MockProviders,
        config: ServiceConfig,
    ) -> anyhow::Result<TestServer> {
        let state = providers.state_with_config(config)?;
        let app = router(state.clone())
            .finish_api(&mut OpenApi::default())
            .with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;
        assert!(server.is_running());

        let response = server.get("/api/does-not-exist").await;
        response.assert_status_not_found();
        Ok(())
    }
}
