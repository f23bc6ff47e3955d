//! Lore response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A freshly generated lore.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedLore {
    pub lore: String,
}

/// Acknowledges a cached lore.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoreCached {
    pub ok: bool,
    /// Number of characters stored.
    pub size: usize,
}

/// Lore restored from the cache cookies.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CachedLore {
    pub lore: String,
    #[serde(default)]
    pub pseudo: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub role: String,
}
