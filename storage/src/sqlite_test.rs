//! Unit tests for SqliteStore.
//!
//! Covers reaction idempotency, summary latest-read, channel links,
//! profiles, and recent post queries.

use tempfile::TempDir;

use crate::models::{ChannelLink, MessageRecord, PublishRecord, ReactionRecord, UserRecord};
use crate::sqlite::SqliteStore;
use crate::store::Store;

async fn test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("relay.db");
    let store = SqliteStore::new(path.to_str().unwrap())
        .await
        .expect("Failed to create store");
    (store, dir)
}

fn post(chat_id: i64, message_id: i64, content: &str) -> MessageRecord {
    MessageRecord::new(
        chat_id,
        0,
        message_id,
        "channel_post".to_string(),
        content.to_string(),
        None,
        None,
        None,
        "received".to_string(),
    )
}

#[tokio::test]
async fn reaction_storage_is_idempotent() {
    let (store, _dir) = test_store().await;

    let reaction = ReactionRecord::new(1, 2, "👍".to_string(), Some(3));
    store.save_reaction(&reaction).await.unwrap();
    store.save_reaction(&reaction).await.unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reactions")
        .fetch_one(store.pool_for_tests())
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn absent_reacting_user_is_stored_as_zero() {
    let (store, _dir) = test_store().await;

    store
        .save_reaction(&ReactionRecord::new(1, 2, "🔥".to_string(), None))
        .await
        .unwrap();

    let user_id: (i64,) = sqlx::query_as("SELECT user_id FROM reactions")
        .fetch_one(store.pool_for_tests())
        .await
        .unwrap();
    assert_eq!(user_id.0, 0);
}

#[tokio::test]
async fn last_summary_returns_latest_by_timestamp() {
    let (store, _dir) = test_store().await;

    assert_eq!(store.last_summary(5).await.unwrap(), None);

    store.save_summary(5, "first").await.unwrap();
    store.save_summary(5, "second").await.unwrap();
    store.save_summary(6, "other chat").await.unwrap();

    assert_eq!(store.last_summary(5).await.unwrap(), Some("second".to_string()));
}

#[tokio::test]
async fn profile_upsert_overwrites() {
    let (store, _dir) = test_store().await;

    assert_eq!(store.get_profile(7).await.unwrap(), None);

    store.set_profile(7, "кратко").await.unwrap();
    store.set_profile(7, "подробно").await.unwrap();

    assert_eq!(store.get_profile(7).await.unwrap(), Some("подробно".to_string()));
}

#[tokio::test]
async fn link_unlink_and_list_channels() {
    let (store, _dir) = test_store().await;

    let link = ChannelLink {
        user_id: 1,
        channel_id: -100,
        title: Some("news".to_string()),
        created_at: chrono::Utc::now(),
    };
    store.link_channel(&link).await.unwrap();
    // Linking twice is an upsert, not a duplicate.
    store.link_channel(&link).await.unwrap();

    let channels = store.list_channels(1).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].channel_id, -100);

    assert!(store.unlink_channel(1, -100).await.unwrap());
    assert!(!store.unlink_channel(1, -100).await.unwrap());
    assert!(store.list_channels(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn user_upsert_updates_fields() {
    let (store, _dir) = test_store().await;

    let mut user = UserRecord {
        id: 42,
        username: Some("old".to_string()),
        first_name: None,
        last_name: None,
    };
    store.upsert_user(&user).await.unwrap();

    user.username = Some("new".to_string());
    store.upsert_user(&user).await.unwrap();

    let row: (Option<String>,) = sqlx::query_as("SELECT username FROM users WHERE id = 42")
        .fetch_one(store.pool_for_tests())
        .await
        .unwrap();
    assert_eq!(row.0, Some("new".to_string()));
}

#[tokio::test]
async fn recent_posts_are_limited_and_oldest_first() {
    let (store, _dir) = test_store().await;

    for i in 0..5 {
        let mut record = post(-100, i, &format!("post {i}"));
        record.created_at = chrono::Utc::now() + chrono::Duration::seconds(i);
        store.save_message(&record).await.unwrap();
    }
    // Plain messages in the same chat are not posts.
    let mut text = post(-100, 99, "not a post");
    text.kind = "text".to_string();
    store.save_message(&text).await.unwrap();

    let posts = store.recent_posts(-100, 3).await.unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].content, "post 2");
    assert_eq!(posts[2].content, "post 4");
}

#[tokio::test]
async fn publish_log_records_status_and_error() {
    let (store, _dir) = test_store().await;

    store.log_publish(&PublishRecord::ok(-100, 1)).await.unwrap();
    store
        .log_publish(&PublishRecord::failed(-100, 1, "forbidden".to_string()))
        .await
        .unwrap();

    let rows: Vec<(String, Option<String>)> =
        sqlx::query_as("SELECT status, error FROM publish_log ORDER BY id")
            .fetch_all(store.pool_for_tests())
            .await
            .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], ("ok".to_string(), None));
    assert_eq!(rows[1].0, "failed");
    assert_eq!(rows[1].1.as_deref(), Some("forbidden"));
}
