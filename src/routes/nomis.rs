use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::{
    embeddings::EmbeddingsWorker,
    error::{AppErr, AppResult},
    models::{ChatBody, ChatResponse, CreateNomi, Message, Nomi, UpdateNomi},
    routes::{ensure_room, required},
    state::{SharedCatalog, SharedHub},
};

pub fn router() -> Router {
    Router::new()
        .route("/nomis", post(create_nomi).get(list_nomis))
        .route("/nomis/:nomi_id", get(get_nomi).patch(update_nomi).delete(delete_nomi))
        .route("/nomis/:nomi_id/chat", post(chat))
}

/* ---------------- CRUD ---------------- */

async fn create_nomi(
    Extension(catalog): Extension<SharedCatalog>,
    Json(mut p): Json<CreateNomi>,
) -> AppResult<impl IntoResponse> {
    p.name = required("name", p.name)?;
    let nomi = catalog.create_nomi(p).await;
    info!(nomi = %nomi.id, name = %nomi.name, "nomi created");
    Ok((StatusCode::CREATED, Json(nomi)))
}

async fn list_nomis(Extension(catalog): Extension<SharedCatalog>) -> Json<Vec<Nomi>> {
    Json(catalog.list_nomis().await)
}

async fn get_nomi(
    Path(nomi_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
) -> AppResult<Json<Nomi>> {
    catalog.get_nomi(&nomi_id).await.map(Json).ok_or(AppErr::NotFound("nomi"))
}

async fn update_nomi(
    Path(nomi_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
    Json(mut p): Json<UpdateNomi>,
) -> AppResult<Json<Nomi>> {
    p.name = p.name.map(|n| required("name", n)).transpose()?;
    catalog.update_nomi(&nomi_id, p).await.map(Json).ok_or(AppErr::NotFound("nomi"))
}

async fn delete_nomi(
    Path(nomi_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
) -> AppResult<StatusCode> {
    if !catalog.delete_nomi(&nomi_id).await {
        return Err(AppErr::NotFound("nomi"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/* ---------------- Chat ---------------- */

async fn chat(
    Path(nomi_id): Path<String>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(hub): Extension<SharedHub>,
    Extension(embeddings): Extension<EmbeddingsWorker>,
    Json(p): Json<ChatBody>,
) -> AppResult<Json<ChatResponse>> {
    let nomi = catalog.get_nomi(&nomi_id).await.ok_or(AppErr::NotFound("nomi"))?;
    if let Some(room_id) = &p.room_id {
        ensure_room(&catalog, room_id).await?;
    }

    let embedding = embeddings.embed(&p.message_text).await?;
    let message = Message::new(p.room_id.clone(), nomi.sender_label(), nomi.reply_to(&p.message_text))
        .with_embedding(embedding)
        .from_agent(nomi.id);

    if let Some(room_id) = &p.room_id {
        hub.publish(room_id, message.clone()).await?;
    }
    Ok(Json(ChatResponse { message }))
}
