//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible implementation.
//! Transport-agnostic; used by the bot's handlers and commands.
//!
//! Three one-shot operations, no retries: chat completion over a message
//! list, image-augmented completion (vision), and audio transcription.

use anyhow::Result;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use async_trait::async_trait;
use prompt::{ChatMessage, MessageRole};

mod openai_llm;

pub use openai_llm::OpenAiLlmClient;

/// LLM client interface: chat, vision, and speech-to-text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given messages (system/user/assistant).
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Describes an image reachable at `image_url`, optionally guided by the
    /// sender's caption. Returns plain text.
    async fn describe_image(&self, image_url: &str, caption: Option<&str>) -> Result<String>;

    /// Transcribes an audio blob (voice or video-note track) to text.
    /// `file_name` carries the extension the API uses to sniff the format.
    async fn transcribe(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
pub(crate) fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars;
/// short keys become plain "***".
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_token_hides_short_keys_entirely() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token(""), "***");
    }

    #[test]
    fn mask_token_keeps_head_and_tail() {
        assert_eq!(mask_token("sk-abcd1234567890wxyz"), "sk-abcd***wxyz");
    }
}
