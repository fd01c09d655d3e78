use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use strategy_core::{
    RaceSnapshot, SessionSummary, SharedEngine, StrategyRecommendation, TrackCharacteristics,
};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    /// One summary line per request on the info log.
    pub log_requests: bool,
}

#[derive(Serialize, Debug)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub characteristics: TrackCharacteristics,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/strategy", post(strategy))
        .route("/observation", post(observation))
        .route("/track", get(track))
        .with_state(state)
}

pub async fn strategy(
    State(state): State<AppState>,
    Json(snapshot): Json<RaceSnapshot>,
) -> Result<Json<StrategyRecommendation>, ApiError> {
    let rec = state.engine.generate_strategy(&snapshot)?;

    if state.log_requests {
        let laps: Vec<String> = rec
            .pit_windows
            .iter()
            .map(|w| format!("{}-{}-{} {}", w.start_lap, w.optimal_lap, w.end_lap, w.recommended_compound))
            .collect();
        tracing::info!(
            "lap={} pos=P{} compound={} age={} stops={} windows=[{}]",
            snapshot.current_lap,
            snapshot.current_position,
            snapshot.current_compound.as_deref().unwrap_or("-"),
            snapshot.tire_age_laps,
            rec.recommended_stops,
            laps.join(", ")
        );
    }
    Ok(Json(rec))
}

pub async fn observation(
    State(state): State<AppState>,
    Json(summary): Json<SessionSummary>,
) -> Json<TrackCharacteristics> {
    Json(state.engine.apply_observation(&summary))
}

pub async fn track(State(state): State<AppState>) -> Json<TrackInfo> {
    let engine = state.engine.current();
    Json(TrackInfo {
        id: engine.track().id.clone(),
        name: engine.track().name.clone(),
        characteristics: engine.characteristics().clone(),
    })
}
