use anyhow::Context;
use strategy_core::{EngineConfig, SharedEngine, StrategyEngine, TrackCatalog};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let track_id = std::env::var("TRACK_ID").context("TRACK_ID not set")?;
    let port: u16 = std::env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);
    let log_requests = std::env::var("LOG_STRATEGY").ok().as_deref() == Some("1");

    let catalog = match std::env::var("CATALOG_PATH") {
        Ok(path) => TrackCatalog::load(&path).with_context(|| format!("loading catalog {path}"))?,
        Err(_) => TrackCatalog::reference(),
    };
    let config = match std::env::var("ENGINE_CONFIG") {
        Ok(path) => EngineConfig::load(&path).with_context(|| format!("loading engine config {path}"))?,
        Err(_) => EngineConfig::default(),
    };

    let engine = StrategyEngine::new(&catalog, &track_id, config)
        .with_context(|| format!("building engine for {track_id}"))?;

    let state = routes::AppState {
        engine: SharedEngine::new(engine),
        log_requests,
    };
    let app = routes::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
