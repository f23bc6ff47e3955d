use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A featured champion of the gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Champion {
    pub id: String,
    pub name: String,
    /// Public path of the portrait.
    pub image: String,
}

/// All featured champions, in display order.
pub type Champions = Vec<Champion>;
