//! Checkout request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::MAX_PROFILE_FIELD_LEN;
use crate::service::ProductVariant;

/// Request to open a hosted checkout for a lore.
///
/// The lore may arrive under several names depending on which page of the
/// frontend posted it; [`CreateCheckout::lore_text`] picks the first
/// non-blank one.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckout {
    #[serde(default)]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub pseudo: String,
    #[serde(default)]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub genre: String,
    #[serde(default)]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub role: String,
    /// Untouched generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<String>,
    /// Text as rendered on the preview page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore_display: Option<String>,
    #[serde(default)]
    pub product_type: ProductVariant,
}

impl CreateCheckout {
    /// Returns the lore to sell: `loreRaw`, `lore`, then the header copy,
    /// then `loreDisplay`, else an empty string.
    pub fn lore_text<'a>(&'a self, header: Option<&'a str>) -> &'a str {
        [
            self.lore_raw.as_deref(),
            self.lore.as_deref(),
            header,
            self.lore_display.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .unwrap_or_default()
    }
}
