//! # Session
//!
//! In-memory conversation state, owned explicitly and injected into handlers
//! at startup (no process-wide singletons).
//!
//! ## Modules
//!
//! - [`store`] – [`SessionStore`]: per-(chat, user) FIFO ring, cap 16 turns
//! - [`chat_log`] – [`ChatLog`]: per-chat FIFO ring for on-demand summaries
//! - [`persona`] – [`Persona`] presets and [`PersonaStore`]
//!
//! Everything here lives in process memory only; a restart clears it.

mod chat_log;
mod persona;
mod store;

pub use chat_log::{ChatLog, CHAT_LOG_CAP};
pub use persona::{Persona, PersonaStore};
pub use store::{SessionKey, SessionStore, MAX_TURNS};

use prompt::{ChatMessage, MessageRole};

/// Role of a stored turn; mirrors the two roles a session ever records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

/// One role-tagged turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }

    /// Converts the turn into a prompt message with the matching API role.
    pub fn to_chat_message(&self) -> ChatMessage {
        match self.role {
            TurnRole::User => ChatMessage {
                role: MessageRole::User,
                content: self.text.clone(),
            },
            TurnRole::Assistant => ChatMessage {
                role: MessageRole::Assistant,
                content: self.text.clone(),
            },
        }
    }
}
