use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use crate::state::{SharedCatalog, SharedHub};

pub async fn health(
    Extension(catalog): Extension<SharedCatalog>,
    Extension(hub): Extension<SharedHub>,
) -> Json<Value> {
    Json(json!({
        "status":      "healthy",
        "rooms":       catalog.room_count().await,
        "connections": hub.connection_count().await,
    }))
}
