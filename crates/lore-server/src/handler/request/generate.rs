//! Lore generation request types.

use lore_service::completion::LorePrompt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum length, in characters, of a player profile field.
pub const MAX_PROFILE_FIELD_LEN: u64 = 64;

/// Request to generate a lore for a player.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct GenerateLore {
    /// In-game name of the player.
    #[validate(length(min = 1, max = MAX_PROFILE_FIELD_LEN))]
    pub pseudo: String,
    /// Preferred genre of the player's champion.
    #[serde(default)]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub genre: String,
    /// Preferred lane or role.
    #[serde(default)]
    #[validate(length(max = MAX_PROFILE_FIELD_LEN))]
    pub role: String,
}

impl GenerateLore {
    pub fn into_prompt(self) -> LorePrompt {
        LorePrompt::new(self.pseudo, self.genre, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_is_required() {
        let request = GenerateLore {
            pseudo: String::new(),
            genre: "Mage".into(),
            role: "Mid".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn length_is_counted_in_characters() {
        let request = GenerateLore {
            pseudo: "é".repeat(64),
            genre: String::new(),
            role: String::new(),
        };
        assert!(request.validate().is_ok());

        let request = GenerateLore {
            pseudo: "a".repeat(65),
            ..request
        };
        assert!(request.validate().is_err());
    }
}
