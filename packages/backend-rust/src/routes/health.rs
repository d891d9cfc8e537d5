use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/info", get(info))
        .route("/live", get(live))
}

async fn root(State(state): State<AppState>) -> Response {
    let response = HealthResponse {
        status: "ok",
        gateway: state.gateway().kind(),
        timestamp: now_iso(),
    };
    Json(response).into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    let response = HealthInfoResponse {
        service: "tuvung-backend",
        version: env!("CARGO_PKG_VERSION"),
        environment: crate::config::env_string("APP_ENV")
            .unwrap_or_else(|| "development".to_string()),
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
        practice_sessions: state.practice().len(),
        flashcard_tests: state.tests().len(),
    };

    Json(response).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    let response = LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    };
    Json(response).into_response()
}

fn system_time_iso(time: std::time::SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    gateway: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthInfoResponse {
    service: &'static str,
    version: &'static str,
    environment: String,
    start_time: String,
    uptime: u64,
    practice_sessions: usize,
    flashcard_tests: usize,
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
}
