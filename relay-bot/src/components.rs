//! Component factory: builds the shared dependencies once at startup and
//! hands them to handlers by clone. Isolates assembly logic from the runner.

use std::sync::Arc;

use anyhow::Result;
use llm_client::{LlmClient, OpenAiLlmClient};
use search::{BraveProvider, DuckDuckGoProvider, FallbackSearch, SearchProvider, SerperProvider};
use session::{ChatLog, PersonaStore, SessionStore};
use storage::{NullStore, SqliteStore, Store};
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::{error, info, instrument};

use crate::adapters::TelegramBotAdapter;
use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::core::{Bot as CoreBot, ChannelGateway};
use crate::enrich::LinkEnricher;
use crate::handlers::{ChatLogHandler, CommandHandler, LlmHandler, PersistenceHandler};
use crate::normalize::ContentNormalizer;

/// Shared dependencies for the runner and handlers.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: Bot,
    /// Populated by the runner's `get_me` before dispatch starts.
    pub bot_me: Arc<tokio::sync::RwLock<Option<Me>>>,
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub chat_log: ChatLog,
    pub personas: PersonaStore,
    pub llm: Arc<dyn LlmClient>,
    pub searcher: FallbackSearch,
    pub normalizer: Arc<ContentNormalizer>,
    pub enricher: Arc<LinkEnricher>,
    pub core_bot: Arc<dyn CoreBot>,
    pub channels: Arc<dyn ChannelGateway>,
}

/// Selects the backing store once from configuration presence; call sites
/// never check for a database again.
pub async fn create_store(config: &BotConfig) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            info!(database_url = %url, "Using SQLite store");
            let store = SqliteStore::new(url).await.map_err(|e| {
                error!(error = %e, database_url = %url, "Failed to initialize SQLite store");
                anyhow::anyhow!("Failed to initialize SQLite store: {}", e)
            })?;
            Ok(Arc::new(store))
        }
        None => {
            info!("DATABASE_URL not set; persistence disabled (no-op store)");
            Ok(Arc::new(NullStore::new()))
        }
    }
}

/// Ordered provider list: key-gated APIs first, keyless scrape last.
pub fn build_search_chain(config: &BotConfig) -> Result<FallbackSearch> {
    let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();
    if let Some(ref key) = config.serper_api_key {
        providers.push(Arc::new(SerperProvider::new(key.clone())?));
    }
    if let Some(ref key) = config.brave_api_key {
        providers.push(Arc::new(BraveProvider::new(key.clone())?));
    }
    providers.push(Arc::new(DuckDuckGoProvider::new()?));
    Ok(FallbackSearch::new(providers))
}

/// Builds all shared components from config.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let mut teloxide_bot = Bot::new(config.bot_token.clone());
    if let Some(ref api_url) = config.telegram_api_url {
        teloxide_bot = teloxide_bot.set_api_url(reqwest::Url::parse(api_url)?);
    }

    let store = create_store(config).await?;

    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiLlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.chat_model.clone(),
        config.transcribe_model.clone(),
    ));

    let normalizer = Arc::new(ContentNormalizer::new(
        teloxide_bot.clone(),
        config.bot_token.clone(),
        config.telegram_api_url.clone(),
        llm.clone(),
    ));

    let core_bot: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let channels: Arc<dyn ChannelGateway> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    Ok(BotComponents {
        teloxide_bot,
        bot_me: Arc::new(tokio::sync::RwLock::new(None)),
        store,
        sessions: SessionStore::new(),
        chat_log: ChatLog::new(),
        personas: PersonaStore::new(),
        llm,
        searcher: build_search_chain(config)?,
        normalizer,
        enricher: Arc::new(LinkEnricher::new()?),
        core_bot,
        channels,
    })
}

/// Chain order: commands first, then persistence/chat-log bookkeeping, then
/// the LLM reply.
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(components.clone())))
        .add_handler(Arc::new(PersistenceHandler::new(components.store.clone())))
        .add_handler(Arc::new(ChatLogHandler::new(components.chat_log.clone())))
        .add_handler(Arc::new(LlmHandler::new(components.clone())))
}
