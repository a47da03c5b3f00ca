//! SQLite implementation of [`Store`] plus the pool wrapper.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use tracing::info;

use crate::error::StorageError;
use crate::models::{
    ChannelLink, ChatRecord, MessageRecord, PublishRecord, ReactionRecord, UserRecord,
};
use crate::store::Store;

/// Manages a single SQLite pool; creates the DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path or `sqlite:` URL).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true)
        } else {
            SqliteConnectOptions::new()
                .filename(database_url)
                .create_if_missing(true)
        };

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Real backing store on SQLite via sqlx. Each write is an independent
/// statement; multi-statement sequences are best-effort, not transactional.
#[derive(Clone)]
pub struct SqliteStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                last_name TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chats (
                id INTEGER PRIMARY KEY,
                chat_type TEXT NOT NULL,
                title TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id INTEGER PRIMARY KEY,
                style TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channel_links (
                user_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                title TEXT,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, channel_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                chat_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                content TEXT NOT NULL,
                media_file_id TEXT,
                reply_to_message_id INTEGER,
                thread_id INTEGER,
                direction TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reactions (
                chat_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                emoji TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (chat_id, message_id, emoji, user_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS publish_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                status TEXT NOT NULL,
                error TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS summaries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id)",
            "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_summaries_chat_id ON summaries(chat_id)",
        ] {
            sqlx::query(statement).execute(pool).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool_for_tests(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, chat_type, title)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                chat_type = excluded.chat_type,
                title = excluded.title
            "#,
        )
        .bind(chat.id)
        .bind(&chat.chat_type)
        .bind(&chat.title)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn save_message(&self, message: &MessageRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO messages
                (id, chat_id, user_id, message_id, kind, content, media_file_id,
                 reply_to_message_id, thread_id, direction, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(message.chat_id)
        .bind(message.user_id)
        .bind(message.message_id)
        .bind(&message.kind)
        .bind(&message.content)
        .bind(&message.media_file_id)
        .bind(message.reply_to_message_id)
        .bind(message.thread_id)
        .bind(&message.direction)
        .bind(message.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(
            chat_id = message.chat_id,
            message_id = message.message_id,
            kind = %message.kind,
            "Saved message"
        );
        Ok(())
    }

    async fn save_reaction(&self, reaction: &ReactionRecord) -> Result<(), StorageError> {
        // INSERT OR IGNORE on the natural key makes repeated submissions a no-op.
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO reactions (chat_id, message_id, emoji, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(reaction.chat_id)
        .bind(reaction.message_id)
        .bind(&reaction.emoji)
        .bind(reaction.user_id)
        .bind(reaction.created_at)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn set_profile(&self, user_id: i64, text: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, style)
            VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET style = excluded.style
            "#,
        )
        .bind(user_id)
        .bind(text)
        .execute(self.pool_manager.pool())
        .await?;

        info!(user_id, "Saved style profile");
        Ok(())
    }

    async fn get_profile(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT style FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(row.map(|r| r.0))
    }

    async fn link_channel(&self, link: &ChannelLink) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO channel_links (user_id, channel_id, title, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, channel_id) DO UPDATE SET title = excluded.title
            "#,
        )
        .bind(link.user_id)
        .bind(link.channel_id)
        .bind(&link.title)
        .bind(link.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(user_id = link.user_id, channel_id = link.channel_id, "Linked channel");
        Ok(())
    }

    async fn unlink_channel(&self, user_id: i64, channel_id: i64) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM channel_links WHERE user_id = ? AND channel_id = ?")
                .bind(user_id)
                .bind(channel_id)
                .execute(self.pool_manager.pool())
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_channels(&self, user_id: i64) -> Result<Vec<ChannelLink>, StorageError> {
        let links = sqlx::query_as::<_, ChannelLink>(
            "SELECT * FROM channel_links WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(links)
    }

    async fn log_publish(&self, record: &PublishRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO publish_log (channel_id, user_id, status, error, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.channel_id)
        .bind(record.user_id)
        .bind(&record.status)
        .bind(&record.error)
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn save_summary(&self, chat_id: i64, text: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO summaries (chat_id, content, created_at) VALUES (?, ?, ?)")
            .bind(chat_id)
            .bind(text)
            .bind(chrono::Utc::now())
            .execute(self.pool_manager.pool())
            .await?;

        info!(chat_id, "Saved chat summary");
        Ok(())
    }

    async fn last_summary(&self, chat_id: i64) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT content FROM summaries WHERE chat_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(chat_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(row.map(|r| r.0))
    }

    async fn recent_posts(
        &self,
        chat_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let mut posts = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT * FROM messages
            WHERE chat_id = ? AND kind = 'channel_post'
            ORDER BY created_at DESC LIMIT ?
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        posts.reverse();
        Ok(posts)
    }
}
