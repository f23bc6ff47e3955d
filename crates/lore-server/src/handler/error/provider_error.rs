//! Provider error to HTTP error conversion.
//!
//! Payment, mail and completion failures all surface as
//! [`lore_service::Error`]. Client mistakes keep their 4xx status, anything
//! the upstream did wrong becomes a gateway error.

use lore_service::ErrorKind as ProviderErrorKind;

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for provider error conversions.
const TRACING_TARGET: &str = "lore_server::handler::provider";

impl From<lore_service::Error> for HttpError<'static> {
    fn from(error: lore_service::Error) -> Self {
        match error.kind() {
            ProviderErrorKind::NetworkError | ProviderErrorKind::Timeout => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = ?error.kind(),
                    "Provider unreachable"
                );
            }
            ProviderErrorKind::Authentication | ProviderErrorKind::Configuration => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = ?error.kind(),
                    "Provider rejected our credentials or configuration"
                );
            }
            ProviderErrorKind::InvalidInput | ProviderErrorKind::NotFound => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = ?error.kind(),
                    "Provider rejected the request"
                );
            }
            _ => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = ?error.kind(),
                    "Provider request failed"
                );
            }
        }

        let context = error.to_string();
        match error.kind() {
            ProviderErrorKind::InvalidInput => ErrorKind::BadRequest
                .with_message(error.message().unwrap_or("Invalid input").to_owned())
                .with_context(context),
            ProviderErrorKind::NotFound => ErrorKind::NotFound
                .with_message("Resource not found")
                .with_context(context),
            ProviderErrorKind::RateLimited => ErrorKind::TooManyRequests
                .with_message("Upstream rate limit exceeded")
                .with_context(context),
            ProviderErrorKind::Timeout => ErrorKind::GatewayTimeout
                .with_message("Upstream request timed out")
                .with_context(context),
            ProviderErrorKind::Configuration | ProviderErrorKind::InternalError => {
                ErrorKind::InternalServerError.with_context(context)
            }
            ProviderErrorKind::Authentication
            | ProviderErrorKind::NetworkError
            | ProviderErrorKind::ServiceUnavailable
            | ProviderErrorKind::ExternalError
            | ProviderErrorKind::Serialization
            | ProviderErrorKind::Unknown => ErrorKind::BadGateway.with_context(context),
        }
    }
}
