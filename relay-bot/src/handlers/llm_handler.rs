//! The reply handler: normalizes content, enriches links, assembles the
//! prompt, calls the LLM, sends the answer, and records the exchange in the
//! session ring.

use async_trait::async_trait;
use prompt::ChatMessage;
use session::Turn;
use tracing::{info, instrument, warn};

use crate::components::BotComponents;
use crate::core::{Handler, HandlerResponse, Message, MessageDirection, MessageKind, Result};

/// Sent instead of a model reply when the LLM call fails.
pub const FALLBACK_REPLY: &str =
    "Извините, не получилось обработать запрос. Попробуйте ещё раз позже.";

pub struct LlmHandler {
    components: BotComponents,
}

impl LlmHandler {
    pub fn new(components: BotComponents) -> Self {
        Self { components }
    }

    /// Gathers per-user context and builds the ordered message list.
    async fn build_prompt(&self, message: &Message, input: &str) -> Vec<ChatMessage> {
        let c = &self.components;

        let profile = match c.store.get_profile(message.user.id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(user_id = message.user.id, error = %e, "Failed to load profile");
                None
            }
        };
        let persona = c.personas.get(message.user.id).await;
        let summary = match c.store.last_summary(message.chat.id).await {
            Ok(s) => s,
            Err(e) => {
                warn!(chat_id = message.chat.id, error = %e, "Failed to load summary");
                None
            }
        };
        let history: Vec<ChatMessage> = c
            .sessions
            .history(message.session_key())
            .await
            .iter()
            .map(Turn::to_chat_message)
            .collect();

        prompt::assemble(
            profile.as_deref(),
            persona.map(|p| p.instruction()),
            summary.as_deref(),
            &history,
            input,
        )
    }
}

#[async_trait]
impl Handler for LlmHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.direction != MessageDirection::Incoming
            || message.kind == MessageKind::ChannelPost
        {
            return Ok(HandlerResponse::Continue);
        }
        if message.content.trim().starts_with('/') {
            return Ok(HandlerResponse::Continue);
        }

        let c = &self.components;

        let normalized = c.normalizer.normalize(message).await;
        if normalized.trim().is_empty() {
            return Ok(HandlerResponse::Ignore);
        }

        let input = match c.enricher.enrich(&normalized).await {
            Some(extra) => format!("{normalized}{extra}"),
            None => normalized,
        };

        let messages = self.build_prompt(message, &input).await;

        let reply = match c.llm.complete(messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!(chat_id = message.chat.id, error = %e, "LLM completion failed");
                FALLBACK_REPLY.to_string()
            }
        };

        c.core_bot.send_message(message.chat.id, &reply).await?;

        let key = message.session_key();
        c.sessions.push(key, Turn::user(input)).await;
        c.sessions.push(key, Turn::assistant(reply.clone())).await;

        info!(chat_id = message.chat.id, reply_len = reply.len(), "Reply sent");
        Ok(HandlerResponse::Reply(reply))
    }
}
