//! # Prompt
//!
//! Assembles structured conversation context into the message list submitted
//! to an OpenAI-compatible chat API.
//!
//! ## Composition order
//!
//! 1. One system message: base instruction, then the user's style profile,
//!    then the active persona instruction (joined with `\n`; absent parts
//!    are skipped).
//! 2. One system message with the last stored chat summary, prefixed with
//!    [`SUMMARY_PREFIX`], when a summary exists.
//! 3. The rolling history for this (chat, user) pair, in arrival order.
//! 4. The new user message.
//!
//! ## External interactions
//!
//! Output is sent verbatim to the chat-completion API by `llm-client`.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of the OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Base system instruction applied to every conversation.
pub const BASE_SYSTEM_PROMPT: &str = "Ты — дружелюбный ассистент в Telegram. \
Отвечай кратко и по делу, только обычным текстом, без Markdown и других символов разметки.";

/// Prefix for the chat-summary system message.
pub const SUMMARY_PREFIX: &str = "Краткая память чата: ";

/// Builds the message list for a chat-completion request.
///
/// `profile`, `persona_instruction`, and `summary` are optional and skipped
/// silently when absent; `history` is expected to already be bounded by the
/// caller's session ring.
///
/// # Returns
///
/// Messages in fixed order: combined system → optional summary system →
/// history → new user message. The result always ends with a `User` message
/// containing `user_text`.
pub fn assemble(
    profile: Option<&str>,
    persona_instruction: Option<&str>,
    summary: Option<&str>,
    history: &[ChatMessage],
    user_text: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);

    let mut system = String::from(BASE_SYSTEM_PROMPT);
    if let Some(profile) = profile {
        system.push('\n');
        system.push_str(profile);
    }
    if let Some(instruction) = persona_instruction {
        system.push('\n');
        system.push_str(instruction);
    }
    messages.push(ChatMessage::system(system));

    if let Some(summary) = summary {
        messages.push(ChatMessage::system(format!("{SUMMARY_PREFIX}{summary}")));
    }

    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(user_text));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_assembly_is_system_plus_question() {
        let messages = assemble(None, None, None, &[], "привет");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, BASE_SYSTEM_PROMPT);
        assert_eq!(messages[1], ChatMessage::user("привет"));
    }

    #[test]
    fn absent_optional_parts_are_skipped_silently() {
        let messages = assemble(Some("пиши формально"), None, None, &[], "q");

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0].content,
            format!("{BASE_SYSTEM_PROMPT}\nпиши формально")
        );
    }

    #[test]
    fn summary_becomes_second_system_message() {
        let messages = assemble(None, None, Some("обсуждали отпуск"), &[], "q");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::System);
        assert_eq!(messages[1].content, "Краткая память чата: обсуждали отпуск");
    }

    #[test]
    fn full_assembly_order_is_invariant() {
        let history = vec![ChatMessage::user("a"), ChatMessage::assistant("b")];
        let messages = assemble(
            Some("P"),
            Some("Ты переводчик."),
            Some("S"),
            &history,
            "c",
        );

        assert_eq!(
            messages,
            vec![
                ChatMessage::system(format!("{BASE_SYSTEM_PROMPT}\nP\nТы переводчик.")),
                ChatMessage::system("Краткая память чата: S"),
                ChatMessage::user("a"),
                ChatMessage::assistant("b"),
                ChatMessage::user("c"),
            ]
        );
    }

    #[test]
    fn last_message_is_always_the_new_user_text() {
        let history = vec![ChatMessage::assistant("earlier")];
        let messages = assemble(None, None, None, &history, "now");

        let last = messages.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "now");
    }
}
