//! Per-chat rolling log used solely for on-demand summarization.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Turn;

/// Default number of turns kept per chat.
pub const CHAT_LOG_CAP: usize = 300;

type LogMap = HashMap<i64, VecDeque<Turn>>;

/// Bounded per-chat turn log with FIFO eviction; same ring semantics as
/// [`crate::SessionStore`] but keyed by chat alone.
#[derive(Debug, Clone)]
pub struct ChatLog {
    logs: Arc<RwLock<LogMap>>,
    cap: usize,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::with_cap(CHAT_LOG_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            logs: Arc::new(RwLock::new(LogMap::new())),
            cap,
        }
    }

    pub async fn push(&self, chat_id: i64, turn: Turn) {
        let mut logs = self.logs.write().await;
        let log = logs.entry(chat_id).or_default();
        log.push_back(turn);
        while log.len() > self.cap {
            log.pop_front();
        }
    }

    /// Returns the logged turns for the chat in arrival order.
    pub async fn turns(&self, chat_id: i64) -> Vec<Turn> {
        let logs = self.logs.read().await;
        logs.get(&chat_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn clear(&self, chat_id: i64) {
        let mut logs = self.logs.write().await;
        logs.remove(&chat_id);
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
