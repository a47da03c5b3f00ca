//! Core model: message types, handler contract, errors, logging.

mod error;
mod logger;
mod types;

pub use error::{HandlerError, RelayError, Result};
pub use logger::init_tracing;
pub use types::{
    Bot, ChannelGateway, Chat, Handler, HandlerResponse, Message, MessageDirection, MessageKind,
    User,
};
