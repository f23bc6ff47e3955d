//! HTTP/HTTPS server startup and lifecycle management.
//!
//! The protocol is picked at compile time: with the `tls` feature and both
//! certificate paths configured the server speaks HTTPS, otherwise HTTP.

mod error;
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

use axum::Router;

use crate::config::ServerConfig;
pub use crate::server::error::{ServerError, ServerResult};
use crate::server::shutdown::shutdown_signal;

/// Starts the server with automatic protocol selection.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration is invalid
/// - TLS certificates cannot be loaded (HTTPS mode)
/// - the address cannot be bound
/// - the server fails while running
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    config.validate().map_err(|e| ServerError::invalid_config(&e))?;

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (config.tls_cert_path.clone(), config.tls_key_path.clone()) {
        return https_server::serve_https(app, config, cert, key).await;
    }

    http_server::serve_http(app, config).await
}
