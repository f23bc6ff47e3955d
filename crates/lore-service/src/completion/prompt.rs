//! Wolf and Lamb lore prompt.

use super::{ChatMessage, CompletionRequest};

/// Inputs of a lore dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LorePrompt {
    pub pseudo: String,
    pub genre: String,
    pub role: String,
}

impl LorePrompt {
    pub fn new(
        pseudo: impl Into<String>,
        genre: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            pseudo: pseudo.into(),
            genre: genre.into(),
            role: role.into(),
        }
    }

    /// Renders the instruction sent as the single user message.
    pub fn render(&self) -> String {
        let Self {
            pseudo,
            genre,
            role,
        } = self;

        format!(
            "Structure your response as a dialogue between Lamb and Wolf, using their tone and poetic style.\n\
             The first sentence is always Wolf saying \"Tell me lamb, who is {pseudo}?\" followed by a phrase giving a surname in relation with the lore.\n\
             Do not include any narration between the lines (e.g. no descriptions like \"Wolf whispered\" or \"Lamb said softly\").\n\
             Only pure dialogue.\n\
             Don't pay attention to the role itself to create the story.\n\
             Include real allies and enemies from League of Legends.\n\
             Limit the dialogue to exactly 12 lines max (6 exchanges).\n\
             Genre: {genre}. Role: {role}."
        )
    }

    /// Wraps the rendered instruction in a completion request.
    pub fn into_request(self) -> CompletionRequest {
        CompletionRequest::new(vec![ChatMessage::user(self.render())])
    }
}
