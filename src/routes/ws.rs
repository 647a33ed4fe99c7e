use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{CloseFrame, Message as Frame, WebSocket, WebSocketUpgrade},
        Extension, Path,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{
    stream::{SplitSink, SplitStream, StreamExt},
    SinkExt,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    connection::{Connection, SendError},
    hub::HubError,
    models::Message,
    state::{SharedCatalog, SharedHub},
};

/* close codes */
const UNKNOWN_ROOM:   u16 = 4000;
const UNSUPPORTED:    u16 = 1003;
const INTERNAL_ERROR: u16 = 1011;

pub fn router() -> Router {
    Router::new().route("/rooms/:room_id", get(ws_handler))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(hub): Extension<SharedHub>,
) -> impl IntoResponse {
    let known = catalog.room_exists(&room_id).await;
    ws.on_upgrade(move |sock| async move {
        if known {
            room_ws(sock, room_id, hub).await;
        } else {
            reject(sock).await;
        }
    })
}

async fn reject(mut sock: WebSocket) {
    let frame = CloseFrame { code: UNKNOWN_ROOM, reason: "room not found".into() };
    sock.send(Frame::Close(Some(frame))).await.ok();
}

/* ---------------- websocket as a room subscriber ---------------- */

struct WsConnection {
    sink: Mutex<SplitSink<WebSocket, Frame>>,
}

impl WsConnection {
    async fn close(&self, code: u16, reason: &'static str) {
        let frame = CloseFrame { code, reason: reason.into() };
        self.sink.lock().await.send(Frame::Close(Some(frame))).await.ok();
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&self, payload: &str) -> Result<(), SendError> {
        self.sink
            .lock()
            .await
            .send(Frame::Text(payload.to_owned()))
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }
}

enum Exit {
    Closed,
    Unsupported,
    Failed(HubError),
}

/* ---------------- per connection ---------------- */
async fn room_ws(sock: WebSocket, room: String, hub: SharedHub) {
    let (sink, mut stream) = sock.split();
    let conn = Arc::new(WsConnection { sink: Mutex::new(sink) });

    let id = match hub.connect(&room, conn.clone()).await {
        Ok(id) => id,
        Err(e) => {
            warn!(room = %room, error = %e, "connect failed");
            conn.close(INTERNAL_ERROR, "replay failed").await;
            return;
        }
    };

    let exit = pump(&room, &hub, &mut stream).await;
    hub.disconnect(&room, id).await;

    match exit {
        Exit::Closed      => debug!(room = %room, connection = %id, "client left"),
        Exit::Unsupported => conn.close(UNSUPPORTED, "text frames only").await,
        Exit::Failed(e)   => {
            warn!(room = %room, connection = %id, error = %e, "room stream failed");
            conn.close(INTERNAL_ERROR, "internal error").await;
        }
    }
}

/// Publish every inbound text frame until the client goes away.
async fn pump(room: &str, hub: &SharedHub, stream: &mut SplitStream<WebSocket>) -> Exit {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Frame::Text(raw)) => {
                let message = Message::new(Some(room.to_owned()), "client", raw);
                if let Err(e) = hub.publish(room, message).await {
                    return Exit::Failed(e);
                }
            }
            Ok(Frame::Binary(_)) => return Exit::Unsupported,
            Ok(Frame::Close(_)) | Err(_) => break,
            Ok(_) => {} // ping / pong
        }
    }
    Exit::Closed
}
