//! Header extractors.

use axum::extract::FromRequestParts;
use axum::http::header::{HOST, ORIGIN};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_more::{Deref, From};

use crate::extract::TRACING_TARGET;
use crate::handler::{Error, ErrorKind};

/// Header carrying the webhook signature.
pub const STRIPE_SIGNATURE_HEADER: HeaderName = HeaderName::from_static("stripe-signature");

/// Header carrying a base64 copy of the lore.
pub const LORE_B64_HEADER: HeaderName = HeaderName::from_static("x-lore-b64");

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Raw `Stripe-Signature` header value.
///
/// Rejects with [`ErrorKind::MissingSignature`] when the header is absent or
/// blank. The value itself is checked by the payment provider.
#[derive(Debug, Clone, Deref, From)]
pub struct StripeSignature(pub String);

impl<S> FromRequestParts<S> for StripeSignature
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header_str(&parts.headers, &STRIPE_SIGNATURE_HEADER) {
            Some(value) => Ok(Self(value.to_owned())),
            None => Err(ErrorKind::MissingSignature.into_error()),
        }
    }
}

impl aide::OperationInput for StripeSignature {}

/// Lore decoded from the `x-lore-b64` header.
///
/// Absent, malformed or non UTF-8 values all yield `None`: the header is a
/// fallback copy, never the only source.
#[derive(Debug, Clone, Default, Deref, From)]
pub struct LoreHeader(pub Option<String>);

impl LoreHeader {
    pub fn decode(value: &str) -> Option<String> {
        let bytes = STANDARD.decode(value.trim()).ok()?;
        String::from_utf8(bytes).ok()
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for LoreHeader
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = header_str(&parts.headers, &LORE_B64_HEADER) else {
            return Ok(Self(None));
        };

        let decoded = Self::decode(value);
        if decoded.is_none() {
            tracing::debug!(
                target: TRACING_TARGET,
                header_len = value.len(),
                "Ignoring undecodable x-lore-b64 header"
            );
        }

        Ok(Self(decoded))
    }
}

impl aide::OperationInput for LoreHeader {}

/// Origin of the page the request was sent from.
///
/// Taken from the `Origin` header, else built as `https://{Host}`. `None`
/// when neither header is present, in which case the handler falls back to
/// the configured public origin.
#[derive(Debug, Clone, Default, Deref, From)]
pub struct RequestOrigin(pub Option<String>);

impl RequestOrigin {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let origin = header_str(headers, &ORIGIN)
            .filter(|origin| *origin != "null")
            .map(|origin| origin.trim_end_matches('/').to_owned())
            .or_else(|| header_str(headers, &HOST).map(|host| format!("https://{host}")));
        Self(origin)
    }

    /// Returns this origin or `fallback`.
    pub fn or_fallback(self, fallback: Option<&str>) -> Option<String> {
        self.0.or_else(|| fallback.map(|f| f.trim_end_matches('/').to_owned()))
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl aide::OperationInput for RequestOrigin {}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn origin_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static("https://lore.example/"));
        headers.insert(HOST, HeaderValue::from_static("internal:3000"));

        let origin = RequestOrigin::from_headers(&headers);
        assert_eq!(origin.as_deref(), Some("https://lore.example"));
    }

    #[test]
    fn host_header_is_assumed_https() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("lore.example"));

        let origin = RequestOrigin::from_headers(&headers);
        assert_eq!(origin.as_deref(), Some("https://lore.example"));
    }

    #[test]
    fn fallback_when_no_headers() {
        let origin = RequestOrigin::from_headers(&HeaderMap::new());
        assert_eq!(origin.as_deref(), None);
        assert_eq!(
            origin.or_fallback(Some("https://shop.example/")),
            Some("https://shop.example".to_owned())
        );
    }

    #[test]
    fn lore_header_decoding() {
        assert_eq!(
            LoreHeader::decode("V29sZjogVGVsbCBtZSBsYW1i"),
            Some("Wolf: Tell me lamb".to_owned())
        );
        assert_eq!(LoreHeader::decode("not base64!"), None);
        assert_eq!(LoreHeader::decode("/w=="), None);
    }
}
