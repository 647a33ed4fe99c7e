//! Room broadcaster: history replay on connect, live fan-out, disconnect.
//!
//! Every room has a delivery gate. `connect` holds it across the history
//! snapshot, the registry join and the replay; `publish` and `broadcast` hold
//! it across the append (publish only), the subscriber snapshot and the
//! fan-out. A newcomer therefore sees each message exactly once, as history
//! or as a live event, and never a live event before its replay finished.
use std::{collections::HashMap, sync::Arc, time::Duration};

use futures_util::future::join_all;
use tokio::{sync::Mutex, time::timeout};
use tracing::{debug, info, warn};

use crate::{
    connection::{Connection, ConnectionId, SendError},
    models::{Message, RoomEvent},
    registry::Registry,
    state::SharedStore,
};

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(thiserror::Error, Debug)]
pub enum HubError {
    #[error("history replay failed: {0}")]
    Replay(#[source] SendError),

    #[error("encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct RoomHub {
    store:        SharedStore,
    registry:     Registry,
    gates:        Mutex<HashMap<String, Arc<Mutex<()>>>>,
    send_timeout: Duration,
}

impl RoomHub {
    pub fn new(store: SharedStore, send_timeout: Duration) -> Self {
        Self {
            store,
            registry: Registry::new(),
            gates: Mutex::default(),
            send_timeout,
        }
    }

    async fn gate(&self, room: &str) -> Arc<Mutex<()>> {
        self.gates.lock().await.entry(room.to_owned()).or_default().clone()
    }

    /// Register `conn` in `room` and replay the current history to it.
    pub async fn connect(&self, room: &str, conn: Arc<dyn Connection>) -> Result<ConnectionId, HubError> {
        let gate = self.gate(room).await;
        let _turn = gate.lock().await;

        let id = ConnectionId::new();
        let history = self.store.history(room).await;
        self.registry.join(room, id, conn.clone()).await;

        for message in &history {
            let payload = RoomEvent::History(message).encode()?;
            if let Err(e) = self.deliver(conn.as_ref(), &payload).await {
                self.registry.leave(room, id).await;
                warn!(room, connection = %id, error = %e, "history replay failed");
                return Err(HubError::Replay(e));
            }
        }

        info!(room, connection = %id, replayed = history.len(), "subscriber connected");
        Ok(id)
    }

    /// Idempotent; returns whether the connection was still registered.
    pub async fn disconnect(&self, room: &str, id: ConnectionId) -> bool {
        let removed = self.registry.leave(room, id).await;
        if removed {
            info!(room, connection = %id, "subscriber disconnected");
        }
        removed
    }

    /// Fan out a message the caller has already appended to the store.
    pub async fn broadcast(&self, room: &str, message: &Message) -> Result<usize, HubError> {
        let gate = self.gate(room).await;
        let _turn = gate.lock().await;
        self.fan_out(room, message).await
    }

    /// Append to the store and fan out as one step.
    pub async fn publish(&self, room: &str, message: Message) -> Result<usize, HubError> {
        let gate = self.gate(room).await;
        let _turn = gate.lock().await;
        self.store.append(room, message.clone()).await;
        self.fan_out(room, &message).await
    }

    pub async fn connection_count(&self) -> usize { self.registry.connection_count().await }

    async fn fan_out(&self, room: &str, message: &Message) -> Result<usize, HubError> {
        let subscribers = self.registry.snapshot(room).await;
        if subscribers.is_empty() {
            return Ok(0);
        }

        let payload = RoomEvent::Live(message).encode()?;
        let sent = join_all(subscribers.iter().map(|sub| {
            let payload = payload.as_str();
            async move {
                match self.deliver(sub.conn.as_ref(), payload).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(room, connection = %sub.id, error = %e, "skipping subscriber");
                        false
                    }
                }
            }
        }))
        .await;

        let delivered = sent.into_iter().filter(|ok| *ok).count();
        debug!(room, message = %message.id, delivered, subscribers = subscribers.len(), "broadcast");
        Ok(delivered)
    }

    async fn deliver(&self, conn: &dyn Connection, payload: &str) -> Result<(), SendError> {
        timeout(self.send_timeout, conn.send(payload))
            .await
            .map_err(|_| SendError::Timeout(self.send_timeout))?
    }
}
