use axum::{routing::get, Router};

use crate::{
    catalog::Catalog,
    error::{bad, AppErr, AppResult},
};

pub mod embeddings;
pub mod nomis;
pub mod rooms;
pub mod system;
pub mod ws;

pub fn router() -> Router {
    Router::new()
        .nest("/api/v1", nomis::router().merge(rooms::router()).merge(embeddings::router()))
        .nest("/ws",     ws::router())
        .route("/health", get(system::health))
}

/* ── shared handler helpers ── */

pub(crate) async fn ensure_room(catalog: &Catalog, room_id: &str) -> AppResult<()> {
    if catalog.room_exists(room_id).await { Ok(()) } else { Err(AppErr::NotFound("room")) }
}

pub(crate) fn required(field: &str, value: String) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(bad(format!("{field} must not be empty")));
    }
    Ok(value)
}
