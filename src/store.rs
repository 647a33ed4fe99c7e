//! Per-room message history with a bounded retention window.
use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

use crate::models::Message;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Room id -> most recent `limit` messages, oldest first.
///
/// History is only ever appended to or trimmed from the front.
pub struct MessageStore {
    limit: usize,
    rooms: RwLock<HashMap<String, VecDeque<Message>>>,
}

impl Default for MessageStore {
    fn default() -> Self { Self::new(DEFAULT_HISTORY_LIMIT) }
}

impl MessageStore {
    pub fn new(limit: usize) -> Self {
        Self { limit: limit.max(1), rooms: RwLock::default() }
    }

    pub fn limit(&self) -> usize { self.limit }

    /// Make sure `room` has a (possibly empty) history.
    pub async fn create(&self, room: &str) {
        self.rooms.write().await.entry(room.to_owned()).or_default();
    }

    pub async fn append(&self, room: &str, message: Message) {
        let mut rooms = self.rooms.write().await;
        let history = rooms.entry(room.to_owned()).or_default();
        history.push_back(message);
        while history.len() > self.limit {
            history.pop_front();
        }
    }

    /// Snapshot of the room history in append order. Unknown rooms are empty.
    pub async fn history(&self, room: &str) -> Vec<Message> {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn exists(&self, room: &str) -> bool {
        self.rooms.read().await.contains_key(room)
    }
}
