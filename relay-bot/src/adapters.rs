//! Conversions between teloxide types and the core model, plus the outbound
//! bot adapter.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};

use crate::core::{
    Bot as CoreBot, ChannelGateway, Chat, Message, MessageDirection, MessageKind, RelayError,
    Result, User,
};

/// Telegram user → core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message → core message. Detects the content kind and extracts the
/// media file reference for the normalizer.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    /// Converts a direct or group message.
    pub fn to_core(&self) -> Message {
        let (kind, media_file_id) = self.detect_kind();
        self.build(kind, media_file_id)
    }

    /// Converts a channel post; the kind is fixed and the acting user absent.
    pub fn to_core_channel_post(&self) -> Message {
        let (_, media_file_id) = self.detect_kind();
        self.build(MessageKind::ChannelPost, media_file_id)
    }

    fn detect_kind(&self) -> (MessageKind, Option<String>) {
        if let Some(sizes) = self.0.photo() {
            let file_id = sizes.last().map(|p| p.file.id.0.clone());
            return (MessageKind::Photo, file_id);
        }
        if let Some(voice) = self.0.voice() {
            return (MessageKind::Voice, Some(voice.file.id.0.clone()));
        }
        if let Some(note) = self.0.video_note() {
            return (MessageKind::VideoNote, Some(note.file.id.0.clone()));
        }
        (MessageKind::Text, None)
    }

    fn build(&self, kind: MessageKind, media_file_id: Option<String>) -> Message {
        Message {
            id: self.0.id.0 as i64,
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(User::absent),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: chat_type_name(&self.0.chat).to_string(),
                title: self.0.chat.title().map(str::to_string),
            },
            content: self
                .0
                .text()
                .or_else(|| self.0.caption())
                .unwrap_or("")
                .to_string(),
            kind,
            media_file_id,
            reply_to_message_id: self.0.reply_to_message().map(|m| m.id.0 as i64),
            thread_id: self.0.thread_id.map(|t| t.0 .0 as i64),
            direction: MessageDirection::Incoming,
            created_at: chrono::Utc::now(),
        }
    }
}

fn chat_type_name(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_channel() {
        "channel"
    } else if chat.is_supergroup() {
        "supergroup"
    } else {
        "group"
    }
}

/// Thin wrapper around teloxide::Bot that implements the core [`CoreBot`]
/// trait. Production sends messages via Telegram; tests substitute another
/// implementation.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ChannelGateway for TelegramBotAdapter {
    async fn resolve_channel(&self, reference: &str) -> Result<(i64, Option<String>)> {
        let recipient = if reference.starts_with('@') {
            Recipient::ChannelUsername(reference.to_string())
        } else {
            let id = reference
                .parse::<i64>()
                .map_err(|_| RelayError::Bot(format!("Not a chat id: {reference}")))?;
            Recipient::Id(ChatId(id))
        };
        let chat = self
            .bot
            .get_chat(recipient)
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        Ok((chat.id.0, chat.title().map(str::to_string)))
    }

    async fn bot_is_admin(&self, channel_id: i64) -> Result<bool> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        let admins = self
            .bot
            .get_chat_administrators(Recipient::Id(ChatId(channel_id)))
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        Ok(admins.iter().any(|m| m.user.id == me.user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("ru".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }

    #[test]
    fn test_absent_user_has_id_zero() {
        let user = User::absent();
        assert_eq!(user.id, 0);
        assert!(user.username.is_none());
    }
}
