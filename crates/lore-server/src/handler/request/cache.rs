//! Lore cache request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in the lore cookie.
pub const MAX_CACHED_LORE_LEN: usize = 3500;

/// Request to remember the current lore in browser cookies.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheLore {
    #[serde(default)]
    pub pseudo: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub lore: String,
}

impl CacheLore {
    /// Returns the lore cut to [`MAX_CACHED_LORE_LEN`] characters.
    pub fn trimmed_lore(&self) -> &str {
        match self.lore.char_indices().nth(MAX_CACHED_LORE_LEN) {
            Some((end, _)) => &self.lore[..end],
            None => &self.lore,
        }
    }
}
