//! Message model and the handler/transport contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// A Telegram user as the core model sees it. An absent user (e.g. an
/// anonymous channel post) is represented with id 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// The placeholder user for events without an acting user.
    pub fn absent() -> Self {
        Self {
            id: 0,
            username: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// The chat (private, group, or channel) a message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
    pub title: Option<String>,
}

/// Inbound content kind; decides which normalizer path runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Photo,
    Voice,
    VideoNote,
    ChannelPost,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Voice => "voice",
            Self::VideoNote => "video_note",
            Self::ChannelPost => "channel_post",
        }
    }
}

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// A single inbound event in the core model, fed through the handler chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Telegram message id within the chat.
    pub id: i64,
    pub user: User,
    pub chat: Chat,
    /// Text or caption; empty for media without caption.
    pub content: String,
    pub kind: MessageKind,
    /// Telegram file id of the attached media, when any.
    pub media_file_id: Option<String>,
    pub reply_to_message_id: Option<i64>,
    pub thread_id: Option<i64>,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Session key for the bounded rolling history: (chat, user).
    pub fn session_key(&self) -> (i64, i64) {
        (self.chat.id, self.user.id)
    }
}

/// Handler result for the chain. `Reply(text)` carries the response body so
/// later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. The chain runs
/// all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> Result<bool> {
        Ok(true)
    }

    /// Processes the message. Return Stop or Reply to end the handle phase.
    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }

    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
        Ok(())
    }
}

/// Outbound messaging seam: production wraps teloxide, tests substitute a
/// recording implementation.
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Channel lookup seam for `/link`, `/unlink`, `/publish`, and `/digest`.
/// Production asks the Telegram API; tests substitute fixed answers.
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Resolves `@username` or a numeric chat id to (channel id, title).
    async fn resolve_channel(&self, reference: &str) -> Result<(i64, Option<String>)>;

    /// Whether this bot is currently an administrator of the channel.
    async fn bot_is_admin(&self, channel_id: i64) -> Result<bool>;
}
