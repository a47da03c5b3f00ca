//! # Storage
//!
//! Persistence for the relay: users, chats, channel links, messages,
//! reactions, publish log, summaries, and style profiles.
//!
//! All call sites talk to the [`Store`] trait. Two implementations exist:
//! [`SqliteStore`] (the real backing store) and [`NullStore`] (selected at
//! startup when no `DATABASE_URL` is configured; every write is a no-op and
//! every read returns an empty/default value).
//!
//! ## Modules
//!
//! - [`error`] – [`StorageError`]
//! - [`models`] – row records
//! - [`store`] – [`Store`] trait and [`NullStore`]
//! - [`sqlite`] – [`SqliteStore`] and [`SqlitePoolManager`]

mod error;
mod models;
mod sqlite;
mod store;

#[cfg(test)]
mod sqlite_test;

pub use error::StorageError;
pub use models::{
    ChannelLink, ChatRecord, MessageRecord, PublishRecord, ReactionRecord, UserRecord,
};
pub use sqlite::{SqlitePoolManager, SqliteStore};
pub use store::{NullStore, Store};
