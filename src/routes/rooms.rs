use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::{
    error::AppResult,
    models::{BroadcastMessage, BroadcastResponse, CreateRoom, Message, Room, RoomMessagesResponse},
    routes::{ensure_room, required},
    state::{SharedCatalog, SharedHub, SharedStore},
};

pub fn router() -> Router {
    Router::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/rooms/:room_id/messages", get(room_messages))
        .route("/rooms/:room_id/broadcast", post(broadcast))
}

async fn create_room(
    Extension(catalog): Extension<SharedCatalog>,
    Extension(store): Extension<SharedStore>,
    Json(p): Json<CreateRoom>,
) -> AppResult<impl IntoResponse> {
    let room = catalog.create_room(required("name", p.name)?).await;
    store.create(&room.id).await;
    info!(room = %room.id, name = %room.name, "room created");
    Ok((StatusCode::CREATED, Json(room)))
}

async fn list_rooms(Extension(catalog): Extension<SharedCatalog>) -> Json<Vec<Room>> {
    Json(catalog.list_rooms().await)
}

async fn room_messages(
    Path(room_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(store): Extension<SharedStore>,
) -> AppResult<Json<RoomMessagesResponse>> {
    ensure_room(&catalog, &room_id).await?;
    Ok(Json(RoomMessagesResponse { messages: store.history(&room_id).await }))
}

async fn broadcast(
    Path(room_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(hub): Extension<SharedHub>,
    Json(p): Json<BroadcastMessage>,
) -> AppResult<Json<BroadcastResponse>> {
    ensure_room(&catalog, &room_id).await?;

    let sender  = p.sender.unwrap_or_else(|| "system".into());
    let message = Message::new(Some(room_id.clone()), sender, p.message_text);
    let delivered = hub.publish(&room_id, message.clone()).await?;
    Ok(Json(BroadcastResponse { delivered, message }))
}
