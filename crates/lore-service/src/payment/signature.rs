//! `Stripe-Signature` webhook header scheme.
//!
//! The header carries a unix timestamp and one or more HMAC-SHA256
//! signatures: `t=1700000000,v1=<hex>,v1=<hex>`. Each signature covers
//! `"{t}." + body` keyed with the endpoint secret.

use std::fmt;
use std::time::Duration;

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use thiserror::Error;

use super::TRACING_TARGET;
use crate::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default accepted age of a signed event.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Reasons a webhook signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature header has no timestamp")]
    MissingTimestamp,
    #[error("signature header has no v1 signature")]
    MissingSignature,
    #[error("signature header is malformed: {0}")]
    Malformed(String),
    #[error("signing secret is not usable")]
    InvalidSecret,
    #[error("timestamp is outside the tolerance of {tolerance_secs}s")]
    Expired { tolerance_secs: u64 },
    #[error("no signature matches the payload")]
    Mismatch,
}

impl From<SignatureError> for Error {
    fn from(error: SignatureError) -> Self {
        Error::authentication()
            .with_message(error.to_string())
            .with_source(error)
    }
}

/// A parsed signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSignature {
    pub timestamp: i64,
    pub signatures: Vec<Vec<u8>>,
}

impl WebhookSignature {
    /// Parses a header value.
    ///
    /// Unknown schemes such as `v0` and `v1` values that are not hex are
    /// skipped; at least one decodable `v1` must remain.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let Some((scheme, value)) = part.trim().split_once('=') else {
                return Err(SignatureError::Malformed(part.trim().to_owned()));
            };

            match scheme {
                "t" => {
                    let parsed = value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::Malformed(format!("t={value}")))?;
                    timestamp = Some(parsed);
                }
                "v1" => match hex::decode(value) {
                    Ok(bytes) => signatures.push(bytes),
                    Err(error) => {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            %error,
                            "Skipping undecodable v1 signature"
                        );
                    }
                },
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
        if signatures.is_empty() {
            return Err(SignatureError::MissingSignature);
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// Signs and verifies webhook bodies with a shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: Duration,
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the accepted age of a signed event.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    fn mac(&self, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::InvalidSecret)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }

    /// Computes the hex signature of `payload` at `timestamp`.
    pub fn sign(&self, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
        let mac = self.mac(timestamp, payload)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Builds a complete header value for `payload` at `timestamp`.
    pub fn header(&self, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
        Ok(format!("t={timestamp},v1={}", self.sign(timestamp, payload)?))
    }

    /// Verifies `header` against `payload` at the current time.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), SignatureError> {
        self.verify_at(payload, header, Timestamp::now())
    }

    /// Verifies `header` against `payload` as if the clock read `now`.
    pub fn verify_at(
        &self,
        payload: &[u8],
        header: &str,
        now: Timestamp,
    ) -> Result<(), SignatureError> {
        let signature = WebhookSignature::parse(header)?;

        let age = now.as_second().abs_diff(signature.timestamp);
        if age > self.tolerance.as_secs() {
            return Err(SignatureError::Expired {
                tolerance_secs: self.tolerance.as_secs(),
            });
        }

        for candidate in &signature.signatures {
            // `verify_slice` compares in constant time.
            if self
                .mac(signature.timestamp, payload)?
                .verify_slice(candidate)
                .is_ok()
            {
                return Ok(());
            }
        }

        Err(SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).expect("valid timestamp")
    }

    #[test]
    fn signature_is_hex_sha256() -> anyhow::Result<()> {
        let signature = WebhookVerifier::new("whsec_test").sign(1_700_000_000, BODY)?;
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        Ok(())
    }

    #[test]
    fn verifies_own_header() -> anyhow::Result<()> {
        let verifier = WebhookVerifier::new("whsec_test");
        let header = verifier.header(1_700_000_000, BODY)?;
        verifier.verify_at(BODY, &header, at(1_700_000_100))?;
        Ok(())
    }

    #[test]
    fn accepts_any_matching_v1() -> anyhow::Result<()> {
        let verifier = WebhookVerifier::new("whsec_new");
        let stale = WebhookVerifier::new("whsec_old").sign(1_700_000_000, BODY)?;
        let fresh = verifier.sign(1_700_000_000, BODY)?;
        let header = format!("t=1700000000,v0=abc,v1={stale},v1={fresh}");

        verifier.verify_at(BODY, &header, at(1_700_000_000))?;
        Ok(())
    }

    #[test]
    fn rejects_tampered_body() -> anyhow::Result<()> {
        let verifier = WebhookVerifier::new("whsec_test");
        let header = verifier.header(1_700_000_000, BODY)?;
        assert_eq!(
            verifier.verify_at(b"{}", &header, at(1_700_000_000)),
            Err(SignatureError::Mismatch)
        );
        Ok(())
    }

    #[test]
    fn rejects_stale_timestamp() -> anyhow::Result<()> {
        let verifier = WebhookVerifier::new("whsec_test").with_tolerance(Duration::from_secs(60));
        let header = verifier.header(1_700_000_000, BODY)?;
        assert_eq!(
            verifier.verify_at(BODY, &header, at(1_700_000_061)),
            Err(SignatureError::Expired { tolerance_secs: 60 })
        );
        Ok(())
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            WebhookSignature::parse("v1=00"),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            WebhookSignature::parse("t=1"),
            Err(SignatureError::MissingSignature)
        );
        assert!(matches!(
            WebhookSignature::parse("t=now,v1=00"),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            WebhookSignature::parse("garbage"),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn skips_undecodable_v1_entries() -> anyhow::Result<()> {
        let verifier = WebhookVerifier::new("whsec_test");
        let valid = verifier.sign(1_700_000_000, BODY)?;
        let header = format!("t=1700000000,v1=not-hex,v1={valid}");

        let parsed = WebhookSignature::parse(&header)?;
        assert_eq!(parsed.signatures.len(), 1);
        verifier.verify_at(BODY, &header, at(1_700_000_000))?;

        assert_eq!(
            WebhookSignature::parse("t=1700000000,v1=zz,v1=0g"),
            Err(SignatureError::MissingSignature)
        );
        Ok(())
    }

    #[test]
    fn converts_to_authentication_error() {
        let error: Error = SignatureError::Mismatch.into();
        assert_eq!(error.kind(), crate::ErrorKind::Authentication);
    }
}
