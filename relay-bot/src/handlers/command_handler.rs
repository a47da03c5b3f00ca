//! Executes the `/`-commands. Runs first in the chain so commands never fall
//! through to the LLM.

use async_trait::async_trait;
use prompt::ChatMessage;
use search::SearchResult;
use session::{Persona, Turn, TurnRole};
use storage::{ChannelLink, PublishRecord, ReactionRecord};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ReactionType, Recipient,
};
use teloxide::utils::command::BotCommands;
use tracing::{info, instrument, warn};

use crate::commands::Command;
use crate::components::BotComponents;
use crate::core::{Handler, HandlerResponse, Message, MessageDirection, MessageKind, Result};

/// Number of results shown by `/search`.
const SEARCH_LIMIT: usize = 5;
/// Number of stored channel posts fed into `/digest`.
const DIGEST_WINDOW: i64 = 50;

const SUMMARIZE_INSTRUCTION: &str =
    "Суммируй диалог ниже в несколько предложений: участники, темы, договорённости. \
Отвечай только текстом сводки.";
const DIGEST_INSTRUCTION: &str =
    "Составь краткий дайджест постов канала ниже: главные новости и темы, по пунктам, \
без вступления.";

pub struct CommandHandler {
    components: BotComponents,
}

impl CommandHandler {
    pub fn new(components: BotComponents) -> Self {
        Self { components }
    }

    async fn bot_username(&self) -> String {
        self.components
            .bot_me
            .read()
            .await
            .as_ref()
            .and_then(|me| me.user.username.clone())
            .unwrap_or_default()
    }

    /// Resolves `@username` or a numeric id to (channel id, title). The error
    /// branch carries the user-facing reply text.
    async fn resolve_channel(
        &self,
        reference: &str,
    ) -> std::result::Result<(i64, Option<String>), String> {
        let reference = reference.trim();
        if !reference.starts_with('@') && reference.parse::<i64>().is_err() {
            return Err("Укажите канал как @имя или числовой id.".to_string());
        }

        match self.components.channels.resolve_channel(reference).await {
            Ok(resolved) => Ok(resolved),
            Err(e) => {
                warn!(reference, error = %e, "Channel resolution failed");
                Err(format!("Канал {} не найден или недоступен боту.", reference))
            }
        }
    }

    /// The link is only created when the bot itself is an administrator of
    /// the channel.
    async fn verify_bot_is_admin(&self, channel_id: i64) -> std::result::Result<(), String> {
        match self.components.channels.bot_is_admin(channel_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err("Сначала добавьте бота администратором канала.".to_string()),
            Err(e) => {
                warn!(channel_id, error = %e, "Admin check failed");
                Err("Не удалось проверить права в канале. Добавьте бота администратором."
                    .to_string())
            }
        }
    }

    async fn cmd_reset(&self, message: &Message) -> HandlerResponse {
        self.components.sessions.reset(message.session_key()).await;
        HandlerResponse::Reply("Контекст очищен.".to_string())
    }

    async fn cmd_style(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let arg = arg.trim();
        let reply = if arg.is_empty() {
            match self.components.store.get_profile(message.user.id).await? {
                Some(profile) => format!("Текущий стиль: {profile}"),
                None => "Стиль не задан. Задайте его так: /style пиши кратко".to_string(),
            }
        } else {
            self.components.store.set_profile(message.user.id, arg).await?;
            "Стиль обновлён.".to_string()
        };
        Ok(HandlerResponse::Reply(reply))
    }

    async fn cmd_role(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let arg = arg.trim();
        if arg.is_empty() {
            let keyboard = persona_keyboard();
            if let Err(e) = self
                .components
                .teloxide_bot
                .send_message(ChatId(message.chat.id), "Выберите роль:")
                .reply_markup(keyboard)
                .await
            {
                warn!(chat_id = message.chat.id, error = %e, "Failed to send persona keyboard");
                return Ok(HandlerResponse::Reply(
                    "Не удалось показать выбор ролей, попробуйте позже.".to_string(),
                ));
            }
            return Ok(HandlerResponse::Stop);
        }

        if arg.eq_ignore_ascii_case("none") || arg == "нет" {
            self.components.personas.clear(message.user.id).await;
            return Ok(HandlerResponse::Reply("Роль сброшена.".to_string()));
        }

        let reply = match Persona::parse(arg) {
            Some(persona) => {
                self.components.personas.set(message.user.id, persona).await;
                format!("Роль установлена: {}.", persona.name())
            }
            None => "Неизвестная роль. Доступны: analyst, translator, coder, none.".to_string(),
        };
        Ok(HandlerResponse::Reply(reply))
    }

    async fn cmd_summarize(&self, message: &Message) -> Result<HandlerResponse> {
        let turns = self.components.chat_log.turns(message.chat.id).await;
        if turns.is_empty() {
            return Ok(HandlerResponse::Reply("Пока нечего суммировать.".to_string()));
        }

        let messages = vec![
            ChatMessage::system(SUMMARIZE_INSTRUCTION),
            ChatMessage::user(transcript(&turns)),
        ];
        match self.components.llm.complete(messages).await {
            Ok(summary) => {
                self.components
                    .store
                    .save_summary(message.chat.id, &summary)
                    .await?;
                Ok(HandlerResponse::Reply(summary))
            }
            Err(e) => {
                warn!(chat_id = message.chat.id, error = %e, "Summarize failed");
                Ok(HandlerResponse::Reply(
                    "Не удалось построить сводку. Попробуйте позже.".to_string(),
                ))
            }
        }
    }

    async fn cmd_link(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Укажите канал: /link @канал".to_string(),
            ));
        }
        let (channel_id, title) = match self.resolve_channel(arg).await {
            Ok(resolved) => resolved,
            Err(reply) => return Ok(HandlerResponse::Reply(reply)),
        };
        if let Err(reply) = self.verify_bot_is_admin(channel_id).await {
            return Ok(HandlerResponse::Reply(reply));
        }

        let link = ChannelLink {
            user_id: message.user.id,
            channel_id,
            title: title.clone(),
            created_at: chrono::Utc::now(),
        };
        self.components.store.link_channel(&link).await?;
        info!(user_id = message.user.id, channel_id, "Channel linked");
        Ok(HandlerResponse::Reply(format!(
            "Канал привязан: {}.",
            title.unwrap_or_else(|| channel_id.to_string())
        )))
    }

    async fn cmd_unlink(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Укажите канал: /unlink @канал".to_string(),
            ));
        }
        let channel_id = match self.resolve_channel(arg).await {
            Ok((id, _)) => id,
            Err(reply) => return Ok(HandlerResponse::Reply(reply)),
        };
        let removed = self
            .components
            .store
            .unlink_channel(message.user.id, channel_id)
            .await?;
        let reply = if removed {
            "Канал отвязан.".to_string()
        } else {
            "Такой канал не привязан.".to_string()
        };
        Ok(HandlerResponse::Reply(reply))
    }

    async fn cmd_channels(&self, message: &Message) -> Result<HandlerResponse> {
        let links = self.components.store.list_channels(message.user.id).await?;
        if links.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Нет привязанных каналов. Привяжите: /link @канал".to_string(),
            ));
        }
        let lines: Vec<String> = links
            .iter()
            .map(|link| {
                format!(
                    "• {} ({})",
                    link.title.as_deref().unwrap_or("без названия"),
                    link.channel_id
                )
            })
            .collect();
        Ok(HandlerResponse::Reply(format!(
            "Привязанные каналы:\n{}",
            lines.join("\n")
        )))
    }

    async fn cmd_publish(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let (explicit_channel, text) = split_publish_args(arg);
        if text.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Укажите текст: /publish [@канал] текст".to_string(),
            ));
        }

        let links = self.components.store.list_channels(message.user.id).await?;
        if links.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Нет привязанных каналов. Сначала /link @канал".to_string(),
            ));
        }

        let target = match explicit_channel {
            Some(reference) => {
                let channel_id = match self.resolve_channel(&reference).await {
                    Ok((id, _)) => id,
                    Err(reply) => return Ok(HandlerResponse::Reply(reply)),
                };
                match links.iter().find(|l| l.channel_id == channel_id) {
                    Some(link) => link.clone(),
                    None => {
                        return Ok(HandlerResponse::Reply(
                            "Этот канал не привязан. Список: /channels".to_string(),
                        ))
                    }
                }
            }
            None if links.len() == 1 => links[0].clone(),
            None => {
                return Ok(HandlerResponse::Reply(
                    "Привязано несколько каналов. Укажите: /publish @канал текст".to_string(),
                ))
            }
        };

        match self
            .components
            .teloxide_bot
            .send_message(Recipient::Id(ChatId(target.channel_id)), text.clone())
            .await
        {
            Ok(_) => {
                self.components
                    .store
                    .log_publish(&PublishRecord::ok(target.channel_id, message.user.id))
                    .await?;
                info!(channel_id = target.channel_id, "Published to channel");
                Ok(HandlerResponse::Reply(format!(
                    "Опубликовано в {}.",
                    target.title.unwrap_or_else(|| target.channel_id.to_string())
                )))
            }
            Err(e) => {
                self.components
                    .store
                    .log_publish(&PublishRecord::failed(
                        target.channel_id,
                        message.user.id,
                        e.to_string(),
                    ))
                    .await?;
                warn!(channel_id = target.channel_id, error = %e, "Publish failed");
                Ok(HandlerResponse::Reply(
                    "Не удалось опубликовать. Проверьте права бота в канале.".to_string(),
                ))
            }
        }
    }

    async fn cmd_react(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let emoji = arg.trim();
        if emoji.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Укажите эмодзи: /react 👍 (ответом на сообщение)".to_string(),
            ));
        }
        let Some(target_id) = message.reply_to_message_id else {
            return Ok(HandlerResponse::Reply(
                "Ответьте на сообщение, к которому нужна реакция.".to_string(),
            ));
        };

        let request = self
            .components
            .teloxide_bot
            .set_message_reaction(ChatId(message.chat.id), MessageId(target_id as i32))
            .reaction(vec![ReactionType::Emoji {
                emoji: emoji.to_string(),
            }]);
        if let Err(e) = request.await {
            warn!(chat_id = message.chat.id, target_id, error = %e, "set_message_reaction failed");
            return Ok(HandlerResponse::Reply(
                "Не удалось поставить реакцию.".to_string(),
            ));
        }

        self.components
            .store
            .save_reaction(&ReactionRecord::new(
                message.chat.id,
                target_id,
                emoji.to_string(),
                Some(message.user.id),
            ))
            .await?;
        Ok(HandlerResponse::Stop)
    }

    async fn cmd_digest(&self, message: &Message, arg: &str) -> Result<HandlerResponse> {
        let arg = arg.trim();
        let links = self.components.store.list_channels(message.user.id).await?;
        if links.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Нет привязанных каналов. Привяжите: /link @канал".to_string(),
            ));
        }

        // Same disambiguation rule as /publish: one link is implicit, more
        // require an explicit reference.
        let link = if arg.is_empty() {
            if links.len() > 1 {
                return Ok(HandlerResponse::Reply(
                    "Привязано несколько каналов. Укажите: /digest @канал".to_string(),
                ));
            }
            links[0].clone()
        } else {
            let channel_id = match self.resolve_channel(arg).await {
                Ok((id, _)) => id,
                Err(reply) => return Ok(HandlerResponse::Reply(reply)),
            };
            match links.iter().find(|l| l.channel_id == channel_id) {
                Some(link) => link.clone(),
                None => {
                    return Ok(HandlerResponse::Reply(
                        "Этот канал не привязан. Список: /channels".to_string(),
                    ))
                }
            }
        };

        let posts = self
            .components
            .store
            .recent_posts(link.channel_id, DIGEST_WINDOW)
            .await?;
        if posts.is_empty() {
            return Ok(HandlerResponse::Reply(
                "Нет сохранённых постов канала.".to_string(),
            ));
        }

        let body: Vec<String> = posts.iter().map(|p| p.content.clone()).collect();
        let messages = vec![
            ChatMessage::system(DIGEST_INSTRUCTION),
            ChatMessage::user(body.join("\n---\n")),
        ];
        match self.components.llm.complete(messages).await {
            Ok(digest) => Ok(HandlerResponse::Reply(digest)),
            Err(e) => {
                warn!(channel_id = link.channel_id, error = %e, "Digest failed");
                Ok(HandlerResponse::Reply(
                    "Не удалось построить дайджест. Попробуйте позже.".to_string(),
                ))
            }
        }
    }

    async fn cmd_search(&self, query: &str) -> HandlerResponse {
        let query = query.trim();
        if query.is_empty() {
            return HandlerResponse::Reply("Укажите запрос: /search погода в Москве".to_string());
        }
        let results = self.components.searcher.search(query, SEARCH_LIMIT).await;
        if results.is_empty() {
            return HandlerResponse::Reply("Ничего не найдено.".to_string());
        }
        HandlerResponse::Reply(format_search_results(&results))
    }

    async fn execute(&self, command: Command, message: &Message) -> Result<HandlerResponse> {
        match command {
            Command::Start => Ok(HandlerResponse::Reply(
                "Привет! Я отвечаю на сообщения, понимаю фото и голосовые. Список команд: /help"
                    .to_string(),
            )),
            Command::Help => Ok(HandlerResponse::Reply(
                Command::descriptions().to_string(),
            )),
            Command::Reset => Ok(self.cmd_reset(message).await),
            Command::Style(arg) => self.cmd_style(message, &arg).await,
            Command::Role(arg) => self.cmd_role(message, &arg).await,
            Command::Summarize => self.cmd_summarize(message).await,
            Command::Link(arg) => self.cmd_link(message, &arg).await,
            Command::Unlink(arg) => self.cmd_unlink(message, &arg).await,
            Command::Channels => self.cmd_channels(message).await,
            Command::Publish(arg) => self.cmd_publish(message, &arg).await,
            Command::React(arg) => self.cmd_react(message, &arg).await,
            Command::Digest(arg) => self.cmd_digest(message, &arg).await,
            Command::Search(query) => Ok(self.cmd_search(&query).await),
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.direction != MessageDirection::Incoming
            || message.kind != MessageKind::Text
            || !message.content.trim().starts_with('/')
        {
            return Ok(HandlerResponse::Continue);
        }

        let username = self.bot_username().await;
        let response = match Command::parse(message.content.trim(), &username) {
            Ok(command) => {
                info!(command = ?command, "Executing command");
                self.execute(command, message).await?
            }
            Err(_) => HandlerResponse::Reply(
                "Неизвестная команда. Отправьте /help для списка команд.".to_string(),
            ),
        };

        if let HandlerResponse::Reply(text) = &response {
            self.components
                .core_bot
                .send_message(message.chat.id, text)
                .await?;
        }
        Ok(response)
    }
}

/// Splits `/publish` arguments into an optional leading `@channel` token and
/// the text to post.
fn split_publish_args(arg: &str) -> (Option<String>, String) {
    let arg = arg.trim();
    if let Some(rest) = arg.strip_prefix('@') {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let channel = parts.next().unwrap_or_default();
        let text = parts.next().unwrap_or_default().trim().to_string();
        return (Some(format!("@{channel}")), text);
    }
    (None, arg.to_string())
}

fn format_search_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n{}\n{}", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain-text rendering of a chat log for summarization prompts.
fn transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| match turn.role {
            TurnRole::User => format!("Пользователь: {}", turn.text),
            TurnRole::Assistant => format!("Ассистент: {}", turn.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn persona_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("Аналитик", "persona:analyst"),
            InlineKeyboardButton::callback("Переводчик", "persona:translator"),
        ],
        vec![
            InlineKeyboardButton::callback("Программист", "persona:coder"),
            InlineKeyboardButton::callback("Без роли", "persona:none"),
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bot as CoreBot, ChannelGateway, Chat, User};
    use crate::enrich::LinkEnricher;
    use crate::normalize::ContentNormalizer;
    use chrono::Utc;
    use llm_client::LlmClient;
    use search::{FallbackSearch, SearchProvider};
    use session::{ChatLog, PersonaStore, SessionStore};
    use std::sync::Arc;
    use storage::{MessageRecord, SqliteStore, Store};
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    struct StubGateway {
        admin: bool,
    }

    #[async_trait]
    impl ChannelGateway for StubGateway {
        async fn resolve_channel(&self, _reference: &str) -> Result<(i64, Option<String>)> {
            Ok((-100, Some("news".to_string())))
        }

        async fn bot_is_admin(&self, _channel_id: i64) -> Result<bool> {
            Ok(self.admin)
        }
    }

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl CoreBot for RecordingBot {
        async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
            self.sent.lock().await.push((chat_id, text.to_string()));
            Ok(())
        }
    }

    struct StubLlm(&'static str);

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn complete(&self, _messages: Vec<ChatMessage>) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }

        async fn describe_image(
            &self,
            _image_url: &str,
            _caption: Option<&str>,
        ) -> anyhow::Result<String> {
            Ok(String::new())
        }

        async fn transcribe(&self, _file_name: &str, _bytes: Vec<u8>) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl SearchProvider for EmptyProvider {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> anyhow::Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }
    }

    async fn fixture(
        dir: &TempDir,
        admin: bool,
    ) -> (CommandHandler, Arc<dyn Store>, Arc<RecordingBot>) {
        let db = dir.path().join("relay.db");
        let store: Arc<dyn Store> =
            Arc::new(SqliteStore::new(db.to_str().unwrap()).await.unwrap());
        let bot = Arc::new(RecordingBot::default());
        let teloxide_bot = teloxide::Bot::new("0000:token");
        let llm: Arc<dyn LlmClient> = Arc::new(StubLlm("дайджест готов"));

        let components = BotComponents {
            teloxide_bot: teloxide_bot.clone(),
            bot_me: Arc::new(tokio::sync::RwLock::new(None)),
            store: store.clone(),
            sessions: SessionStore::new(),
            chat_log: ChatLog::new(),
            personas: PersonaStore::new(),
            llm: llm.clone(),
            searcher: FallbackSearch::new(vec![
                Arc::new(EmptyProvider) as Arc<dyn SearchProvider>
            ]),
            normalizer: Arc::new(ContentNormalizer::new(
                teloxide_bot,
                "0000:token".to_string(),
                None,
                llm,
            )),
            enricher: Arc::new(LinkEnricher::new().unwrap()),
            core_bot: bot.clone(),
            channels: Arc::new(StubGateway { admin }),
        };
        (CommandHandler::new(components), store, bot)
    }

    fn command_message(text: &str) -> Message {
        Message {
            id: 1,
            user: User {
                id: 7,
                username: Some("ivan".to_string()),
                first_name: None,
                last_name: None,
            },
            chat: Chat {
                id: 42,
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

    fn link(channel_id: i64, title: &str) -> ChannelLink {
        ChannelLink {
            user_id: 7,
            channel_id,
            title: Some(title.to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn link_is_rejected_when_bot_is_not_admin() {
        let dir = TempDir::new().unwrap();
        let (handler, store, bot) = fixture(&dir, false).await;

        let response = handler.handle(&command_message("/link @news")).await.unwrap();

        assert_eq!(
            response,
            HandlerResponse::Reply("Сначала добавьте бота администратором канала.".to_string())
        );
        // The rejection must not leave a stored link behind.
        assert!(store.list_channels(7).await.unwrap().is_empty());
        assert_eq!(bot.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn link_persists_when_bot_is_admin() {
        let dir = TempDir::new().unwrap();
        let (handler, store, _bot) = fixture(&dir, true).await;

        let response = handler.handle(&command_message("/link @news")).await.unwrap();

        assert_eq!(
            response,
            HandlerResponse::Reply("Канал привязан: news.".to_string())
        );
        let links = store.list_channels(7).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].channel_id, -100);
    }

    #[tokio::test]
    async fn search_with_all_empty_providers_reports_nothing_found() {
        let dir = TempDir::new().unwrap();
        let (handler, _store, bot) = fixture(&dir, true).await;

        let response = handler
            .handle(&command_message("/search несуществующий запрос"))
            .await
            .unwrap();

        assert_eq!(
            response,
            HandlerResponse::Reply("Ничего не найдено.".to_string())
        );
        assert_eq!(bot.sent.lock().await[0], (42, "Ничего не найдено.".to_string()));
    }

    #[tokio::test]
    async fn digest_asks_for_a_channel_when_several_are_linked() {
        let dir = TempDir::new().unwrap();
        let (handler, store, _bot) = fixture(&dir, true).await;
        store.link_channel(&link(-100, "news")).await.unwrap();
        store.link_channel(&link(-200, "other")).await.unwrap();

        let response = handler.handle(&command_message("/digest")).await.unwrap();

        assert_eq!(
            response,
            HandlerResponse::Reply("Привязано несколько каналов. Укажите: /digest @канал".to_string())
        );
    }

    #[tokio::test]
    async fn digest_over_the_single_link_summarizes_stored_posts() {
        let dir = TempDir::new().unwrap();
        let (handler, store, _bot) = fixture(&dir, true).await;
        store.link_channel(&link(-100, "news")).await.unwrap();
        store
            .save_message(&MessageRecord::new(
                -100,
                0,
                1,
                "channel_post".to_string(),
                "новость дня".to_string(),
                None,
                None,
                None,
                "incoming".to_string(),
            ))
            .await
            .unwrap();

        let response = handler.handle(&command_message("/digest")).await.unwrap();

        assert_eq!(response, HandlerResponse::Reply("дайджест готов".to_string()));
    }

    #[test]
    fn publish_args_split_leading_channel_reference() {
        assert_eq!(
            split_publish_args("@news свежий пост"),
            (Some("@news".to_string()), "свежий пост".to_string())
        );
        assert_eq!(split_publish_args("просто текст"), (None, "просто текст".to_string()));
        assert_eq!(split_publish_args("@news"), (Some("@news".to_string()), String::new()));
        assert_eq!(split_publish_args("  "), (None, String::new()));
    }

    #[test]
    fn search_results_are_numbered() {
        let results = vec![
            SearchResult {
                title: "Первый".to_string(),
                url: "https://a.example".to_string(),
                snippet: "описание".to_string(),
            },
            SearchResult {
                title: "Второй".to_string(),
                url: "https://b.example".to_string(),
                snippet: "ещё".to_string(),
            },
        ];

        let text = format_search_results(&results);
        assert!(text.starts_with("1. Первый\nhttps://a.example"));
        assert!(text.contains("\n\n2. Второй\n"));
    }

    #[test]
    fn transcript_tags_roles() {
        let turns = vec![Turn::user("привет"), Turn::assistant("здравствуйте")];
        assert_eq!(
            transcript(&turns),
            "Пользователь: привет\nАссистент: здравствуйте"
        );
    }

    #[test]
    fn persona_keyboard_covers_all_presets_and_none() {
        let keyboard = persona_keyboard();
        let data: Vec<String> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            data,
            vec![
                "persona:analyst",
                "persona:translator",
                "persona:coder",
                "persona:none"
            ]
        );
    }
}
