//! HTTP error with a builder for per-request details.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// The error type returned by every handler.
///
/// The [`ErrorKind`] fixes the status code and error name. The message,
/// context and resource refine what the client sees; context is only
/// logged.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
}

impl Error<'static> {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            resource: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches internal context, logged but not serialized.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Replaces the default client-facing message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Names the resource the error relates to.
    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Detaches the error from any borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
        }
    }

    /// Builds the serializable response body.
    pub fn response(&self) -> ErrorResponse<'_> {
        let mut response: ErrorResponse<'_> = self.kind.response();
        if let Some(message) = self.message.as_deref() {
            response = response.with_message(message);
        }
        if let Some(resource) = self.resource.as_deref() {
            response = response.with_resource(resource);
        }
        if let Some(context) = self.context.as_deref() {
            response = response.with_context(context);
        }
        response
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref message) = self.message {
            debug_struct.field("message", message);
        }
        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }
        if let Some(ref resource) = self.resource {
            debug_struct.field("resource", resource);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(&response.message);

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }
        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {resource}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse<'static>;
}

/// A specialized [`Result`] type for handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every error a handler can return, grouped by status family.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400, malformed or invalid request data.
    BadRequest,
    /// 400, webhook delivered without a signature header.
    MissingSignature,
    /// 400, webhook signature mismatch or stale timestamp.
    InvalidSignature,
    /// 402, checkout session exists but is not paid.
    PaymentRequired,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 429, a provider throttled us.
    TooManyRequests,

    // 5xx Server Errors
    /// 500
    #[default]
    InternalServerError,
    /// 502, a provider failed or answered unusably.
    BadGateway,
    /// 503
    ServiceUnavailable,
    /// 504, a provider did not answer in time.
    GatewayTimeout,
}

impl ErrorKind {
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self,
            context: Some(context.into()),
            message: None,
            resource: None,
        }
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self,
            context: None,
            message: Some(message.into()),
            resource: None,
        }
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self,
            context: None,
            message: None,
            resource: Some(resource.into()),
        }
    }

    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the default response for this kind.
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::MissingSignature => ErrorResponse::MISSING_SIGNATURE,
            Self::InvalidSignature => ErrorResponse::INVALID_SIGNATURE,
            Self::PaymentRequired => ErrorResponse::PAYMENT_REQUIRED,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::MethodNotAllowed => ErrorResponse::METHOD_NOT_ALLOWED,
            Self::TooManyRequests => ErrorResponse::TOO_MANY_REQUESTS,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::BadGateway => ErrorResponse::BAD_GATEWAY,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout => ErrorResponse::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ErrorKind; 11] = [
        ErrorKind::BadRequest,
        ErrorKind::MissingSignature,
        ErrorKind::InvalidSignature,
        ErrorKind::PaymentRequired,
        ErrorKind::NotFound,
        ErrorKind::MethodNotAllowed,
        ErrorKind::TooManyRequests,
        ErrorKind::InternalServerError,
        ErrorKind::BadGateway,
        ErrorKind::ServiceUnavailable,
        ErrorKind::GatewayTimeout,
    ];

    #[test]
    fn default_is_internal() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.message().is_none());
    }

    #[test]
    fn builder_chaining() {
        let error = ErrorKind::PaymentRequired
            .with_message("Session not paid")
            .with_resource("checkout_session")
            .with_context("payment_status=unpaid");

        assert_eq!(error.kind(), ErrorKind::PaymentRequired);
        assert_eq!(error.message(), Some("Session not paid"));
        assert_eq!(error.resource(), Some("checkout_session"));
        assert_eq!(error.context(), Some("payment_status=unpaid"));
    }

    #[test]
    fn message_replaces_default() {
        let error = ErrorKind::BadRequest.with_message("Missing session_id");
        let response = error.response();
        assert_eq!(response.message, "Missing session_id");
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn display_includes_name_and_status() {
        let error = ErrorKind::InvalidSignature.with_context("timestamp outside tolerance");
        let display = error.to_string();
        assert!(display.contains("invalid_signature"));
        assert!(display.contains("400"));
        assert!(display.contains("timestamp outside tolerance"));
    }

    #[test]
    fn into_static_keeps_fields() {
        let resource = String::from("lore");
        let error = ErrorKind::NotFound.with_resource(resource.as_str());
        let error = error.into_static();
        drop(resource);
        assert_eq!(error.resource(), Some("lore"));
    }

    #[test]
    fn signature_kinds_are_bad_requests() {
        assert_eq!(
            ErrorKind::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorKind::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorKind::MissingSignature.to_string(), "missing_signature");
    }

    #[test]
    fn all_kinds_have_distinct_names() {
        let mut names: Vec<_> = ALL_KINDS.iter().map(|k| k.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ALL_KINDS.len());
    }

    #[test]
    fn provider_failures_map_to_gateway_statuses() {
        assert_eq!(ErrorKind::BadGateway.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ErrorKind::GatewayTimeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ErrorKind::PaymentRequired.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
    }
}
