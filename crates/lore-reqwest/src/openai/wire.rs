//! Chat completions request and response bodies.

use lore_service::completion::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionReply {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionReply {
    /// Content and finish reason of the first choice.
    pub fn into_first(self) -> (Option<String>, Option<String>) {
        self.choices
            .into_iter()
            .next()
            .map(|choice| {
                (
                    choice.message.and_then(|message| message.content),
                    choice.finish_reason,
                )
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_request_body() -> anyhow::Result<()> {
        let messages = [ChatMessage::user("Tell me lamb")];
        let body = ChatCompletionBody {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.8,
        };

        let json = serde_json::to_value(&body)?;
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Tell me lamb");
        Ok(())
    }

    #[test]
    fn reads_first_choice() -> anyhow::Result<()> {
        let reply: ChatCompletionReply = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Wolf: Tell me lamb" }, "finish_reason": "stop" }
            ],
            "usage": { "total_tokens": 10 }
        }))?;

        assert_eq!(reply.model.as_deref(), Some("gpt-4o-2024-08-06"));
        let (content, finish_reason) = reply.into_first();
        assert_eq!(content.as_deref(), Some("Wolf: Tell me lamb"));
        assert_eq!(finish_reason.as_deref(), Some("stop"));
        Ok(())
    }

    #[test]
    fn empty_choices_yield_nothing() -> anyhow::Result<()> {
        let reply: ChatCompletionReply = serde_json::from_str(r#"{"choices":[]}"#)?;
        assert_eq!(reply.into_first(), (None, None));
        Ok(())
    }
}
