use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::fmt::Display;

use crate::{embeddings::EmbedError, hub::HubError};

pub type AppResult<T> = Result<T, AppErr>;

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("{0}")]
    Bad(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Config: {0}")]
    Config(String),

    #[error("Hub: {0}")]
    Hub(#[from] HubError),

    #[error("Embeddings: {0}")]
    Embed(#[from] EmbedError),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppErr {
    fn into_response(self) -> axum::response::Response {
        let code = match self {
            AppErr::Bad(_)      => StatusCode::BAD_REQUEST,
            AppErr::NotFound(_) => StatusCode::NOT_FOUND,
            ref other           => {
                tracing::error!(error = %other, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (code, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/* ── helper: turn any error into Bad ── */
pub fn bad<E: Display>(e: E) -> AppErr { AppErr::Bad(e.to_string()) }
