use anyhow::Context;
use nomi_rooms::{app, config::Settings, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings   = Settings::from_env()?;
    let state      = AppState::new(&settings);
    let embeddings = state.embeddings.clone();

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("bind {}", settings.bind_addr))?;
    tracing::info!(
        addr          = %settings.bind_addr,
        history_limit = settings.history_limit,
        static_dir    = ?settings.static_dir,
        "listening"
    );

    axum::serve(listener, app(state, &settings).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    embeddings.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("shutting down");
}
