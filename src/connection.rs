//! The narrow capability the hub needs from a live subscriber.
use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("connection closed")]
    Closed,

    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport: {0}")]
    Transport(String),
}

/// Anything that can push a serialized room event to one client.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn send(&self, payload: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for ConnectionId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A registered connection as seen from a room.
#[derive(Clone)]
pub struct Subscriber {
    pub id:   ConnectionId,
    pub conn: Arc<dyn Connection>,
}
