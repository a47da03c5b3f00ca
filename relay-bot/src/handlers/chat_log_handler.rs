//! Feeds the per-chat rolling log used by `/summarize`.
//!
//! Commands are not conversation, so '/'-prefixed texts are skipped.

use async_trait::async_trait;
use session::{ChatLog, Turn};

use crate::core::{Handler, HandlerResponse, Message, MessageDirection, Result};

pub struct ChatLogHandler {
    chat_log: ChatLog,
}

impl ChatLogHandler {
    pub fn new(chat_log: ChatLog) -> Self {
        Self { chat_log }
    }

    /// Only plain conversation enters the log: incoming, non-empty, not a
    /// command. The same test gates the assistant side so the log never
    /// records one half of an exchange (e.g. an uncaptioned photo's reply).
    fn loggable(message: &Message) -> bool {
        let text = message.content.trim();
        message.direction == MessageDirection::Incoming
            && !text.is_empty()
            && !text.starts_with('/')
    }
}

#[async_trait]
impl Handler for ChatLogHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        if Self::loggable(message) {
            self.chat_log
                .push(message.chat.id, Turn::user(message.content.trim()))
                .await;
        }
        Ok(true)
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        if !Self::loggable(message) {
            return Ok(());
        }
        if let HandlerResponse::Reply(text) = response {
            self.chat_log
                .push(message.chat.id, Turn::assistant(text.clone()))
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chat, MessageKind, User};
    use chrono::Utc;
    use session::TurnRole;

    fn text_message(chat_id: i64, text: &str) -> Message {
        Message {
            id: 1,
            user: User {
                id: 5,
                username: Some("ivan".to_string()),
                first_name: Some("Иван".to_string()),
                last_name: None,
            },
            chat: Chat {
                id: chat_id,
                chat_type: "private".to_string(),
                title: None,
            },
            content: text.to_string(),
            kind: MessageKind::Text,
            media_file_id: None,
            reply_to_message_id: None,
            thread_id: None,
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn logs_user_and_assistant_turns() {
        let log = ChatLog::new();
        let handler = ChatLogHandler::new(log.clone());
        let message = text_message(10, "как дела?");

        handler.before(&message).await.unwrap();
        handler
            .after(&message, &HandlerResponse::Reply("хорошо".to_string()))
            .await
            .unwrap();

        let turns = log.turns(10).await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].text, "как дела?");
        assert_eq!(turns[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn skips_commands_and_empty_texts() {
        let log = ChatLog::new();
        let handler = ChatLogHandler::new(log.clone());

        handler.before(&text_message(10, "/reset")).await.unwrap();
        handler.before(&text_message(10, "   ")).await.unwrap();
        handler
            .after(
                &text_message(10, "/reset"),
                &HandlerResponse::Reply("Контекст очищен.".to_string()),
            )
            .await
            .unwrap();

        assert!(log.turns(10).await.is_empty());
    }

    #[tokio::test]
    async fn captionless_media_exchange_stays_out_entirely() {
        let log = ChatLog::new();
        let handler = ChatLogHandler::new(log.clone());

        let mut photo = text_message(10, "");
        photo.kind = MessageKind::Photo;
        photo.media_file_id = Some("file".to_string());

        handler.before(&photo).await.unwrap();
        handler
            .after(&photo, &HandlerResponse::Reply("на фото кот".to_string()))
            .await
            .unwrap();

        // Neither a lone assistant turn nor an empty user turn is logged.
        assert!(log.turns(10).await.is_empty());
    }

    #[tokio::test]
    async fn non_reply_responses_log_nothing() {
        let log = ChatLog::new();
        let handler = ChatLogHandler::new(log.clone());
        let message = text_message(10, "текст");

        handler.after(&message, &HandlerResponse::Stop).await.unwrap();
        assert!(log.turns(10).await.is_empty());
    }
}
