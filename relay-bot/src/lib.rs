//! # Relay bot
//!
//! Conversational Telegram relay: webhook ingress → handler chain →
//! LLM reply → optional persistence. Wires the `session`, `storage`,
//! `search`, `prompt`, and `llm-client` crates together.

pub mod adapters;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod core;
pub mod enrich;
pub mod handlers;
pub mod normalize;
pub mod runner;

pub use chain::HandlerChain;
pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, BotComponents};
pub use config::BotConfig;
pub use core::{
    init_tracing, Bot, ChannelGateway, Chat, Handler, HandlerError, HandlerResponse, Message,
    MessageDirection, MessageKind, RelayError, Result, User,
};
pub use runner::run_bot;
