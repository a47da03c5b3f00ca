//! Persists inbound events and outgoing replies through the [`Store`] seam.
//!
//! Storage failures are logged and swallowed: the relay keeps answering even
//! when the database is unavailable.

use std::sync::Arc;

use async_trait::async_trait;
use storage::{ChatRecord, MessageRecord, Store, UserRecord};
use tracing::{debug, warn};

use crate::core::{Handler, HandlerResponse, Message, MessageDirection, Result};

pub struct PersistenceHandler {
    store: Arc<dyn Store>,
}

impl PersistenceHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn inbound_record(message: &Message) -> MessageRecord {
        MessageRecord::new(
            message.chat.id,
            message.user.id,
            message.id,
            message.kind.as_str().to_string(),
            message.content.clone(),
            message.media_file_id.clone(),
            message.reply_to_message_id,
            message.thread_id,
            "incoming".to_string(),
        )
    }

    fn outgoing_record(message: &Message, text: &str) -> MessageRecord {
        MessageRecord::new(
            message.chat.id,
            0,
            0,
            "text".to_string(),
            text.to_string(),
            None,
            Some(message.id),
            message.thread_id,
            "outgoing".to_string(),
        )
    }
}

#[async_trait]
impl Handler for PersistenceHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.direction != MessageDirection::Incoming {
            return Ok(true);
        }

        if message.user.id != 0 {
            let user = UserRecord {
                id: message.user.id,
                username: message.user.username.clone(),
                first_name: message.user.first_name.clone(),
                last_name: message.user.last_name.clone(),
            };
            if let Err(e) = self.store.upsert_user(&user).await {
                warn!(user_id = message.user.id, error = %e, "Failed to upsert user");
            }
        }

        let chat = ChatRecord {
            id: message.chat.id,
            chat_type: message.chat.chat_type.clone(),
            title: message.chat.title.clone(),
        };
        if let Err(e) = self.store.upsert_chat(&chat).await {
            warn!(chat_id = message.chat.id, error = %e, "Failed to upsert chat");
        }

        if let Err(e) = self.store.save_message(&Self::inbound_record(message)).await {
            warn!(
                chat_id = message.chat.id,
                message_id = message.id,
                error = %e,
                "Failed to save inbound message"
            );
        } else {
            debug!(
                chat_id = message.chat.id,
                message_id = message.id,
                kind = message.kind.as_str(),
                "Inbound message saved"
            );
        }

        Ok(true)
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        if let HandlerResponse::Reply(text) = response {
            if let Err(e) = self
                .store
                .save_message(&Self::outgoing_record(message, text))
                .await
            {
                warn!(chat_id = message.chat.id, error = %e, "Failed to save outgoing message");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chat, MessageKind, User};
    use chrono::Utc;
    use storage::SqliteStore;
    use tempfile::tempdir;

    fn channel_post(chat_id: i64, message_id: i64, text: &str) -> Message {
        Message {
            id: message_id,
            user: User::absent(),
            chat: Chat {
                id: chat_id,
                chat_type: "channel".to_string(),
                title: Some("news".to_string()),
            },
            content: text.to_string(),
            kind: MessageKind::ChannelPost,
            media_file_id: None,
            reply_to_message_id: None,
            thread_id: None,
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn saves_inbound_channel_posts() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("relay.db");
        let store = Arc::new(SqliteStore::new(db.to_str().unwrap()).await.unwrap());
        let handler = PersistenceHandler::new(store.clone());

        assert!(handler.before(&channel_post(-100, 1, "первый пост")).await.unwrap());
        assert!(handler.before(&channel_post(-100, 2, "второй пост")).await.unwrap());

        let posts = store.recent_posts(-100, 10).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].content, "первый пост");
        assert_eq!(posts[0].user_id, 0);
        assert_eq!(posts[1].content, "второй пост");
    }

    #[tokio::test]
    async fn outgoing_reply_is_saved_without_breaking_recent_posts() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("relay.db");
        let store = Arc::new(SqliteStore::new(db.to_str().unwrap()).await.unwrap());
        let handler = PersistenceHandler::new(store.clone());

        let message = channel_post(-100, 1, "пост");
        handler.before(&message).await.unwrap();
        handler
            .after(&message, &HandlerResponse::Reply("ответ".to_string()))
            .await
            .unwrap();

        // recent_posts filters by kind, so the outgoing text row stays out.
        let posts = store.recent_posts(-100, 10).await.unwrap();
        assert_eq!(posts.len(), 1);
    }
}
