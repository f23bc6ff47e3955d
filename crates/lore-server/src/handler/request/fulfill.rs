//! Fulfillment request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::MAX_PROFILE_FIELD_LEN;

/// Request to deliver the lore of a paid checkout session.
///
/// Profile fields left empty are read back from the session metadata.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Fulfill {
    #[serde(default)]
    #[validate(custom(function = "validate_session_id"))]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub pseudo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub role: Option<String>,
}

impl Fulfill {
    /// Returns the trimmed session id, if any.
    pub fn session_id(&self) -> Option<&str> {
        Some(self.session_id.trim()).filter(|id| !id.is_empty())
    }

    /// Returns the lore sent by the client, if it is not blank.
    pub fn lore(&self) -> Option<&str> {
        self.lore.as_deref().filter(|lore| !lore.trim().is_empty())
    }
}

/// Accepts `cs_` followed by `[A-Za-z0-9_]`, ignoring surrounding blanks.
///
/// A blank id passes here and is reported as missing by the handler.
fn validate_session_id(session_id: &str) -> Result<(), ValidationError> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Ok(());
    }

    let well_formed = session_id.strip_prefix("cs_").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
    });
    if well_formed {
        return Ok(());
    }

    Err(ValidationError::new("session_id")
        .with_message("must be a checkout session id (cs_...)".into()))
}
