//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Each concern is an extension trait on the router:
//! - [`RouterRecoveryExt`]: panics, timeouts and middleware errors
//! - [`RouterObservabilityExt`]: request ids, tracing spans, header redaction
//! - [`RouterSecurityExt`]: CORS, security headers, body limits, compression
//! - [`RouterOpenApiExt`]: OpenAPI document and Scalar UI
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lore_server::middleware::*;
//!
//! let app = api_router
//!     .with_open_api(OpenApiConfig::default())
//!     .with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
