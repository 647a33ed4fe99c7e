use axum::{extract::Extension, routing::post, Json, Router};

use crate::{
    embeddings::EmbeddingsWorker,
    error::AppResult,
    models::{EmbeddingRequest, EmbeddingResponse},
};

pub fn router() -> Router {
    Router::new().route("/embeddings", post(generate))
}

async fn generate(
    Extension(embeddings): Extension<EmbeddingsWorker>,
    Json(p): Json<EmbeddingRequest>,
) -> AppResult<Json<EmbeddingResponse>> {
    Ok(Json(EmbeddingResponse { embedding: embeddings.embed(&p.text).await? }))
}
