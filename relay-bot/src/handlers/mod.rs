//! Built-in handlers, in chain order: commands, persistence, chat log, LLM.

mod chat_log_handler;
mod command_handler;
mod llm_handler;
mod persistence_handler;

pub use chat_log_handler::ChatLogHandler;
pub use command_handler::CommandHandler;
pub use llm_handler::LlmHandler;
pub use persistence_handler::PersistenceHandler;
