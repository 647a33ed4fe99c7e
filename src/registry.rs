//! Live subscribers per room.
use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::connection::{Connection, ConnectionId, Subscriber};

type Members = HashMap<ConnectionId, Arc<dyn Connection>>;

#[derive(Default)]
pub struct Registry {
    rooms: RwLock<HashMap<String, Members>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub async fn join(&self, room: &str, id: ConnectionId, conn: Arc<dyn Connection>) {
        self.rooms.write().await.entry(room.to_owned()).or_default().insert(id, conn);
    }

    /// Remove `id` from `room`; an emptied room entry is dropped.
    /// Returns whether the connection was registered.
    pub async fn leave(&self, room: &str, id: ConnectionId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(members) = rooms.get_mut(room) else { return false };
        let removed = members.remove(&id).is_some();
        if members.is_empty() {
            rooms.remove(room);
        }
        removed
    }

    /// Point-in-time copy for iterating without the lock.
    pub async fn snapshot(&self, room: &str) -> Vec<Subscriber> {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .map(|(id, conn)| Subscriber { id: *id, conn: conn.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn room_count(&self) -> usize { self.rooms.read().await.len() }

    pub async fn connection_count(&self) -> usize {
        self.rooms.read().await.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SendError;
    use async_trait::async_trait;

    struct Null;

    #[async_trait]
    impl Connection for Null {
        async fn send(&self, _payload: &str) -> Result<(), SendError> { Ok(()) }
    }

    #[tokio::test]
    async fn join_then_snapshot() {
        let reg = Registry::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        reg.join("r", a, Arc::new(Null)).await;
        reg.join("r", b, Arc::new(Null)).await;
        reg.join("other", ConnectionId::new(), Arc::new(Null)).await;

        let mut ids: Vec<_> = reg.snapshot("r").await.into_iter().map(|s| s.id).collect();
        ids.sort_by_key(|id| id.to_string());
        let mut want = vec![a, b];
        want.sort_by_key(|id| id.to_string());
        assert_eq!(ids, want);
        assert_eq!(reg.connection_count().await, 3);
    }

    #[tokio::test]
    async fn last_leave_prunes_room() {
        let reg = Registry::new();
        let id = ConnectionId::new();
        reg.join("r", id, Arc::new(Null)).await;
        assert_eq!(reg.room_count().await, 1);

        assert!(reg.leave("r", id).await);
        assert_eq!(reg.room_count().await, 0);
        assert!(reg.snapshot("r").await.is_empty());
    }

    #[tokio::test]
    async fn leave_is_idempotent() {
        let reg = Registry::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());
        reg.join("r", a, Arc::new(Null)).await;
        reg.join("r", b, Arc::new(Null)).await;

        assert!(reg.leave("r", a).await);
        assert!(!reg.leave("r", a).await);
        assert!(!reg.leave("r", ConnectionId::new()).await);
        assert!(!reg.leave("nowhere", a).await);

        let left: Vec<_> = reg.snapshot("r").await.into_iter().map(|s| s.id).collect();
        assert_eq!(left, vec![b]);
    }

    #[tokio::test]
    async fn snapshot_is_detached() {
        let reg = Registry::new();
        let id = ConnectionId::new();
        reg.join("r", id, Arc::new(Null)).await;
        let snap = reg.snapshot("r").await;
        reg.leave("r", id).await;
        assert_eq!(snap.len(), 1);
    }
}
