//! OpenAI implementation of [`LlmClient`] on top of async-openai.

use anyhow::{anyhow, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    AudioInput, ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
    CreateTranscriptionRequestArgs, ImageUrlArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::{info, instrument};

use super::{chat_message_to_openai, mask_token, LlmClient};

/// Caption fallback when a photo arrives without one.
const DEFAULT_VISION_PROMPT: &str = "Опиши, что изображено на этой картинке.";

/// LLM client over an OpenAI-compatible API with configurable base URL and
/// separate model ids for chat and transcription.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    chat_model: String,
    transcribe_model: String,
    api_key_for_logging: String,
}

impl OpenAiLlmClient {
    pub fn new(
        api_key: String,
        base_url: String,
        chat_model: String,
        transcribe_model: String,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
            chat_model,
            transcribe_model,
            api_key_for_logging: api_key,
        }
    }

    async fn chat(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        info!(
            model = %self.chat_model,
            message_count = messages.len(),
            api_key = %mask_token(&self.api_key_for_logging),
            "Chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(ref usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("Chat completion returned no choices"))
    }
}

#[async_trait]
impl LlmClient for OpenAiLlmClient {
    #[instrument(skip(self, messages))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.chat(openai_messages).await
    }

    #[instrument(skip(self))]
    async fn describe_image(&self, image_url: &str, caption: Option<&str>) -> Result<String> {
        let text = caption
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_VISION_PROMPT);

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(text)
                .build()?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(ImageUrlArgs::default().url(image_url).build()?)
                .build()?
                .into(),
        ];

        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(parts)
            .build()?
            .into();

        self.chat(vec![message]).await
    }

    #[instrument(skip(self, bytes))]
    async fn transcribe(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        info!(
            model = %self.transcribe_model,
            file_name = %file_name,
            size = bytes.len(),
            "Transcription request"
        );

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name.to_string(), bytes))
            .model(&self.transcribe_model)
            .build()?;

        let response = self.client.audio().transcribe(request).await?;
        Ok(response.text)
    }
}
