//! The [`Store`] trait and its no-op implementation.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{
    ChannelLink, ChatRecord, MessageRecord, PublishRecord, ReactionRecord, UserRecord,
};

/// Persistence interface used by every handler and command.
///
/// Implementations: [`crate::SqliteStore`] (real), [`NullStore`] (selected
/// once at startup when persistence is not configured, so call sites carry
/// no conditional checks).
#[async_trait]
pub trait Store: Send + Sync {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StorageError>;
    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<(), StorageError>;
    async fn save_message(&self, message: &MessageRecord) -> Result<(), StorageError>;

    /// Idempotent on (chat, message, emoji, user).
    async fn save_reaction(&self, reaction: &ReactionRecord) -> Result<(), StorageError>;

    async fn set_profile(&self, user_id: i64, text: &str) -> Result<(), StorageError>;
    async fn get_profile(&self, user_id: i64) -> Result<Option<String>, StorageError>;

    async fn link_channel(&self, link: &ChannelLink) -> Result<(), StorageError>;
    /// Returns true when a link existed and was removed.
    async fn unlink_channel(&self, user_id: i64, channel_id: i64) -> Result<bool, StorageError>;
    async fn list_channels(&self, user_id: i64) -> Result<Vec<ChannelLink>, StorageError>;

    async fn log_publish(&self, record: &PublishRecord) -> Result<(), StorageError>;

    async fn save_summary(&self, chat_id: i64, text: &str) -> Result<(), StorageError>;
    /// Latest summary by timestamp, if any.
    async fn last_summary(&self, chat_id: i64) -> Result<Option<String>, StorageError>;

    /// Most recent stored channel posts for a chat, oldest first.
    async fn recent_posts(
        &self,
        chat_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError>;
}

/// No-op store: writes succeed without effect, reads return empty/default.
#[derive(Debug, Clone, Default)]
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Store for NullStore {
    async fn upsert_user(&self, _user: &UserRecord) -> Result<(), StorageError> {
        Ok(())
    }

    async fn upsert_chat(&self, _chat: &ChatRecord) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save_message(&self, _message: &MessageRecord) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save_reaction(&self, _reaction: &ReactionRecord) -> Result<(), StorageError> {
        Ok(())
    }

    async fn set_profile(&self, _user_id: i64, _text: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get_profile(&self, _user_id: i64) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn link_channel(&self, _link: &ChannelLink) -> Result<(), StorageError> {
        Ok(())
    }

    async fn unlink_channel(&self, _user_id: i64, _channel_id: i64) -> Result<bool, StorageError> {
        Ok(false)
    }

    async fn list_channels(&self, _user_id: i64) -> Result<Vec<ChannelLink>, StorageError> {
        Ok(Vec::new())
    }

    async fn log_publish(&self, _record: &PublishRecord) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save_summary(&self, _chat_id: i64, _text: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn last_summary(&self, _chat_id: i64) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn recent_posts(
        &self,
        _chat_id: i64,
        _limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        Ok(Vec::new())
    }
}
