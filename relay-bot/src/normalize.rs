//! Content normalizer: best-effort plain-text representation for each
//! inbound kind. One-shot calls, no retries; failures become placeholders.

use std::sync::Arc;

use llm_client::LlmClient;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{info, instrument, warn};

use crate::core::{Message, MessageKind};

const PHOTO_PLACEHOLDER: &str = "[не удалось разобрать изображение]";
const VOICE_PLACEHOLDER: &str = "[не удалось расшифровать голосовое сообщение]";
const VIDEO_NOTE_PLACEHOLDER: &str = "[не удалось расшифровать видеосообщение]";

/// Turns media messages into text via the vision and transcription APIs.
pub struct ContentNormalizer {
    bot: teloxide::Bot,
    bot_token: String,
    telegram_api_url: String,
    llm: Arc<dyn LlmClient>,
}

impl ContentNormalizer {
    pub fn new(
        bot: teloxide::Bot,
        bot_token: String,
        telegram_api_url: Option<String>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            bot,
            bot_token,
            telegram_api_url: telegram_api_url
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            llm,
        }
    }

    /// Plain-text representation of the message. Text and channel posts pass
    /// through; media goes through one external call each.
    #[instrument(skip(self, message))]
    pub async fn normalize(&self, message: &Message) -> String {
        match message.kind {
            MessageKind::Text | MessageKind::ChannelPost => message.content.clone(),
            MessageKind::Photo => self.describe_photo(message).await,
            MessageKind::Voice => self.transcribe_media(message, "voice.ogg", VOICE_PLACEHOLDER).await,
            MessageKind::VideoNote => {
                self.transcribe_media(message, "video_note.mp4", VIDEO_NOTE_PLACEHOLDER).await
            }
        }
    }

    async fn file_url(&self, file_id: &str) -> anyhow::Result<String> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        Ok(format!(
            "{}/file/bot{}/{}",
            self.telegram_api_url.trim_end_matches('/'),
            self.bot_token,
            file.path
        ))
    }

    async fn download(&self, file_id: &str) -> anyhow::Result<Vec<u8>> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        let mut buf: Vec<u8> = Vec::new();
        self.bot.download_file(&file.path, &mut buf).await?;
        Ok(buf)
    }

    async fn describe_photo(&self, message: &Message) -> String {
        let Some(ref file_id) = message.media_file_id else {
            return PHOTO_PLACEHOLDER.to_string();
        };

        let caption = (!message.content.is_empty()).then_some(message.content.as_str());

        let described = match self.file_url(file_id).await {
            Ok(url) => self.llm.describe_image(&url, caption).await,
            Err(e) => Err(e),
        };

        match described {
            Ok(text) if !text.trim().is_empty() => {
                info!(chat_id = message.chat.id, "Photo described");
                text
            }
            Ok(_) => PHOTO_PLACEHOLDER.to_string(),
            Err(e) => {
                warn!(chat_id = message.chat.id, error = %e, "Photo description failed");
                PHOTO_PLACEHOLDER.to_string()
            }
        }
    }

    async fn transcribe_media(
        &self,
        message: &Message,
        file_name: &str,
        placeholder: &str,
    ) -> String {
        let Some(ref file_id) = message.media_file_id else {
            return placeholder.to_string();
        };

        let transcribed = match self.download(file_id).await {
            Ok(bytes) => self.llm.transcribe(file_name, bytes).await,
            Err(e) => Err(e),
        };

        match transcribed {
            Ok(text) if !text.trim().is_empty() => {
                info!(chat_id = message.chat.id, "Media transcribed");
                text
            }
            Ok(_) => placeholder.to_string(),
            Err(e) => {
                warn!(chat_id = message.chat.id, error = %e, "Transcription failed");
                placeholder.to_string()
            }
        }
    }
}
