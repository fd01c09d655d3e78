mod config;
mod model;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use strategy_core::{StrategyEngine, StrategyRecommendation, TrackCatalog};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg_path = config::resolve_config_path();
    let cfg = config::FeedConfig::load(&cfg_path)?;
    let catalog = match &cfg.catalog_path {
        Some(path) => TrackCatalog::load(path)?,
        None => TrackCatalog::reference(),
    };
    let engine = StrategyEngine::new(&catalog, &cfg.track_id, cfg.engine.clone())
        .with_context(|| format!("building engine for {}", cfg.track_id))?;
    let engine = Arc::new(engine);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8765".to_string());
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind TCP listener at {bind_addr}"))?;
    tracing::info!("pit wall feed for {} listening on ws://{}", engine.track().id, bind_addr);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::info!("connection from {}", peer);
                tokio::spawn(handle_connection(stream, Arc::clone(&engine)));
            }
            Err(e) => {
                tracing::error!("accept error: {}", e);
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, engine: Arc<StrategyEngine>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!("websocket handshake failed: {}", e);
            return;
        }
    };
    let (mut write, mut read) = ws_stream.split();
    let mut tracker = model::RaceTracker::new();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("read error: {}", e);
                break;
            }
        };
        if !msg.is_text() {
            continue;
        }

        let reply = match msg.to_text().map(|text| process(text, &mut tracker, &engine)) {
            Ok(Ok(rec)) => {
                log_summary(&rec);
                serde_json::to_string(&rec).unwrap_or_else(|e| error_reply(&e))
            }
            Ok(Err(e)) => error_reply(&e),
            Err(e) => error_reply(&e),
        };

        if let Err(e) = write.send(Message::Text(reply)).await {
            tracing::warn!("send failed: {}", e);
            break;
        }
    }
}

fn process(
    text: &str,
    tracker: &mut model::RaceTracker,
    engine: &StrategyEngine,
) -> anyhow::Result<StrategyRecommendation> {
    let packet: model::LapPacket = serde_json::from_str(text).context("invalid lap packet")?;
    let snapshot = tracker.observe(&packet)?;
    Ok(engine.generate_strategy(&snapshot)?)
}

fn error_reply(e: &dyn std::fmt::Display) -> String {
    tracing::warn!("rejected packet: {}", e);
    json!({ "error": e.to_string() }).to_string()
}

fn log_summary(rec: &StrategyRecommendation) {
    let windows: Vec<String> = rec
        .pit_windows
        .iter()
        .map(|w| format!("L{}-{} {}", w.start_lap, w.end_lap, w.recommended_compound))
        .collect();
    let risk = rec
        .situation
        .as_ref()
        .map_or("-".to_string(), |s| format!("{:?}/{:.2}", s.risk_level, s.tire_wear));
    tracing::info!(
        "[ lap ] remaining={} stops={} windows=[{}] risk={} notes={}",
        rec.remaining_laps,
        rec.recommended_stops,
        windows.join(", "),
        risk,
        rec.rationale.len()
    );
}
