//! Row records mirroring inbound Telegram events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upserted row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Upserted row of the `chats` table (groups, private chats, channels).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatRecord {
    pub id: i64,
    pub chat_type: String,
    pub title: Option<String>,
}

/// One stored message or channel post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub chat_id: i64,
    pub user_id: i64,
    pub message_id: i64,
    pub kind: String,
    pub content: String,
    pub media_file_id: Option<String>,
    pub reply_to_message_id: Option<i64>,
    pub thread_id: Option<i64>,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Creates a record with a generated UUID and current timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chat_id: i64,
        user_id: i64,
        message_id: i64,
        kind: String,
        content: String,
        media_file_id: Option<String>,
        reply_to_message_id: Option<i64>,
        thread_id: Option<i64>,
        direction: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            user_id,
            message_id,
            kind,
            content,
            media_file_id,
            reply_to_message_id,
            thread_id,
            direction,
            created_at: Utc::now(),
        }
    }
}

/// One reaction event; deduplicated on (chat, message, emoji, user).
/// An absent acting user is stored as user id 0.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReactionRecord {
    pub chat_id: i64,
    pub message_id: i64,
    pub emoji: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl ReactionRecord {
    pub fn new(chat_id: i64, message_id: i64, emoji: String, user_id: Option<i64>) -> Self {
        Self {
            chat_id,
            message_id,
            emoji,
            user_id: user_id.unwrap_or(0),
            created_at: Utc::now(),
        }
    }
}

/// A user-to-channel link; created only after the bot is verified as an
/// administrator of the channel.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelLink {
    pub user_id: i64,
    pub channel_id: i64,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One publish attempt to a linked channel (status + error text).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublishRecord {
    pub channel_id: i64,
    pub user_id: i64,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PublishRecord {
    pub fn ok(channel_id: i64, user_id: i64) -> Self {
        Self {
            channel_id,
            user_id,
            status: "ok".to_string(),
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn failed(channel_id: i64, user_id: i64, error: String) -> Self {
        Self {
            channel_id,
            user_id,
            status: "failed".to_string(),
            error: Some(error),
            created_at: Utc::now(),
        }
    }
}
