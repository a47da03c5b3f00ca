//! Per-(chat, user) rolling history with FIFO eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Turn;

/// Maximum number of exchanges kept per session; the ring stores
/// `MAX_TURNS * 2` turns (one user + one assistant turn per exchange).
pub const MAX_TURNS: usize = 8;

/// Key of one session: (chat id, user id).
pub type SessionKey = (i64, i64);

type RingMap = HashMap<SessionKey, VecDeque<Turn>>;

/// Bounded rolling history per (chat, user) pair.
///
/// Push beyond the cap drops the oldest turn; this is a plain bounded queue,
/// not an LRU. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    rings: Arc<RwLock<RingMap>>,
    cap: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_cap(MAX_TURNS * 2)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            rings: Arc::new(RwLock::new(RingMap::new())),
            cap,
        }
    }

    /// Appends a turn, evicting the oldest one when the ring is full.
    pub async fn push(&self, key: SessionKey, turn: Turn) {
        let mut rings = self.rings.write().await;
        let ring = rings.entry(key).or_default();
        ring.push_back(turn);
        while ring.len() > self.cap {
            ring.pop_front();
        }
        debug!(chat_id = key.0, user_id = key.1, len = ring.len(), "Session turn stored");
    }

    /// Returns the stored turns for the key in arrival order (empty when none).
    pub async fn history(&self, key: SessionKey) -> Vec<Turn> {
        let rings = self.rings.read().await;
        rings
            .get(&key)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes exactly this key's history; other keys are unaffected.
    pub async fn reset(&self, key: SessionKey) {
        let mut rings = self.rings.write().await;
        rings.remove(&key);
        debug!(chat_id = key.0, user_id = key.1, "Session reset");
    }

    pub async fn len(&self, key: SessionKey) -> usize {
        let rings = self.rings.read().await;
        rings.get(&key).map(VecDeque::len).unwrap_or(0)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
