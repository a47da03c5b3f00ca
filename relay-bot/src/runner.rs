//! Webhook runner: registers the webhook listener and routes Telegram
//! updates into the handler chain.

use anyhow::{Context, Result};
use session::Persona;
use storage::ReactionRecord;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageReactionUpdated, ReactionType};
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;
use crate::commands::Command;
use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::core::init_tracing;

/// Starts the bot and blocks until the dispatcher stops.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;

    if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    init_tracing(&config.log_file)?;

    info!(port = config.port, endpoint = %config.webhook_endpoint(), "Starting relay bot");

    let components = build_bot_components(&config).await?;
    let bot = components.teloxide_bot.clone();

    let me = bot.get_me().await.context("get_me failed")?;
    info!(username = ?me.user.username, "Authorized as bot");
    *components.bot_me.write().await = Some(me);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register command list");
    }

    let chain = build_handler_chain(&components);

    let addr = ([0, 0, 0, 0], config.port).into();
    let url = config
        .webhook_endpoint()
        .parse()
        .context("Invalid webhook endpoint URL")?;
    let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url))
        .await
        .context("Failed to register webhook")?;

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_edited_message().endpoint(handle_message))
        .branch(Update::filter_channel_post().endpoint(handle_channel_post))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(Update::filter_message_reaction_updated().endpoint(handle_reaction));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![components, chain])
        .default_handler(|update| async move {
            tracing::debug!(update_id = ?update.id, "Unhandled update kind");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Webhook listener error"),
        )
        .await;

    Ok(())
}

async fn handle_message(
    msg: Message,
    _components: BotComponents,
    chain: HandlerChain,
) -> ResponseResult<()> {
    let message = TelegramMessageWrapper(&msg).to_core();
    if let Err(e) = chain.handle(&message).await {
        error!(chat_id = message.chat.id, message_id = message.id, error = %e, "Chain failed");
    }
    Ok(())
}

async fn handle_channel_post(
    msg: Message,
    _components: BotComponents,
    chain: HandlerChain,
) -> ResponseResult<()> {
    let message = TelegramMessageWrapper(&msg).to_core_channel_post();
    if let Err(e) = chain.handle(&message).await {
        error!(chat_id = message.chat.id, message_id = message.id, error = %e, "Chain failed");
    }
    Ok(())
}

/// Persona selection from the `/role` inline keyboard. Data format:
/// `persona:<name>` with `none` clearing the assignment.
async fn handle_callback(
    bot: Bot,
    components: BotComponents,
    query: CallbackQuery,
) -> ResponseResult<()> {
    let user_id = query.from.id.0 as i64;

    let text = match query.data.as_deref().and_then(|d| d.strip_prefix("persona:")) {
        Some("none") => {
            components.personas.clear(user_id).await;
            Some("Роль сброшена.".to_string())
        }
        Some(name) => match Persona::parse(name) {
            Some(persona) => {
                components.personas.set(user_id, persona).await;
                Some(format!("Роль установлена: {}.", persona.name()))
            }
            None => {
                warn!(user_id, data = ?query.data, "Unknown persona in callback");
                None
            }
        },
        None => None,
    };

    bot.answer_callback_query(query.id.clone()).await?;

    if let (Some(text), Some(message)) = (text, query.message.as_ref()) {
        bot.edit_message_text(message.chat().id, message.id(), text)
            .await?;
    }
    Ok(())
}

/// Persists reaction events; the storage key makes repeated deliveries
/// idempotent.
async fn handle_reaction(
    components: BotComponents,
    update: MessageReactionUpdated,
) -> ResponseResult<()> {
    let user_id = update.user().map(|u| u.id.0 as i64);
    for reaction in &update.new_reaction {
        if let ReactionType::Emoji { emoji } = reaction {
            let record = ReactionRecord::new(
                update.chat.id.0,
                update.message_id.0 as i64,
                emoji.clone(),
                user_id,
            );
            if let Err(e) = components.store.save_reaction(&record).await {
                warn!(chat_id = update.chat.id.0, error = %e, "Failed to save reaction");
            }
        }
    }
    Ok(())
}
