//! Internal error types for lore-reqwest.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for lore-reqwest operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Internal error type for lore-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The provider answered with a non-success status.
    #[error("{provider} returned {status}: {message}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        message: String,
    },
    /// Configuration rejected before any request was sent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error envelope shared by Stripe, OpenAI and most mail APIs.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl Error {
    /// Returns `response` if successful, or reads its body into [`Error::Api`].
    pub(crate) async fn check(provider: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::Api {
            provider,
            status,
            message: Self::api_message(&body, status),
        })
    }

    fn api_message(body: &str, status: StatusCode) -> String {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        parsed
            .error
            .and_then(|detail| detail.message)
            .or(parsed.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned()
            })
    }
}

impl From<Error> for lore_service::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    lore_service::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    lore_service::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    lore_service::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    lore_service::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => lore_service::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Api { status, .. } => {
                let base = match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        lore_service::Error::authentication()
                    }
                    StatusCode::NOT_FOUND => lore_service::Error::not_found(),
                    StatusCode::TOO_MANY_REQUESTS => lore_service::Error::rate_limited(),
                    status if status.is_server_error() => {
                        lore_service::Error::service_unavailable()
                    }
                    _ => lore_service::Error::external_error(),
                };
                base.with_message(err.to_string())
            }
            Error::Config(message) => lore_service::Error::configuration().with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use lore_service::ErrorKind;

    use super::*;

    fn api(status: StatusCode) -> lore_service::Error {
        Error::Api {
            provider: "stripe",
            status,
            message: "boom".into(),
        }
        .into()
    }

    #[test]
    fn maps_statuses_to_kinds() {
        assert_eq!(api(StatusCode::UNAUTHORIZED).kind(), ErrorKind::Authentication);
        assert_eq!(api(StatusCode::NOT_FOUND).kind(), ErrorKind::NotFound);
        assert_eq!(api(StatusCode::TOO_MANY_REQUESTS).kind(), ErrorKind::RateLimited);
        assert_eq!(api(StatusCode::BAD_GATEWAY).kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(api(StatusCode::BAD_REQUEST).kind(), ErrorKind::ExternalError);
    }

    #[test]
    fn api_message_is_kept() {
        let error = api(StatusCode::BAD_REQUEST);
        assert_eq!(
            error.message(),
            Some("stripe returned 400 Bad Request: boom")
        );
    }

    #[test]
    fn extracts_provider_messages() {
        let stripe = r#"{"error":{"type":"invalid_request_error","message":"No such price: 'price_x'"}}"#;
        assert_eq!(
            Error::api_message(stripe, StatusCode::BAD_REQUEST),
            "No such price: 'price_x'"
        );

        let mail = r#"{"statusCode":422,"message":"Invalid `to` field"}"#;
        assert_eq!(
            Error::api_message(mail, StatusCode::UNPROCESSABLE_ENTITY),
            "Invalid `to` field"
        );

        assert_eq!(
            Error::api_message("<html>", StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
    }
}
