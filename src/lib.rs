//! Chat-room hub: nomis, rooms, capped per-room history and live websocket fan-out.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod embeddings;
pub mod error;
pub mod hub;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;
pub mod store;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};

use crate::{config::Settings, state::AppState};

/// Full application router with every shared handle attached.
pub fn app(state: AppState, settings: &Settings) -> Router {
    let mut app = routes::router();
    if let Some(dir) = &settings.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(Extension(state.catalog))
        .layer(Extension(state.store))
        .layer(Extension(state.hub))
        .layer(Extension(state.embeddings))
        .layer(DefaultBodyLimit::max(settings.body_limit))
        .layer(RequestBodyLimitLayer::new(settings.body_limit))
}
