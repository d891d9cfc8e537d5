use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{optional_user, require_user};
use crate::response::{AppError, SuccessResponse};
use crate::routes::parse_id;
use crate::services::practice::{self, StartPractice};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsQuery {
    lecture_ids: Option<String>,
}

#[derive(Serialize)]
struct DeletedResponse {
    deleted: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/answer", post(answer))
        .route("/sessions/:id/advance", post(advance))
        .route("/sessions/:id/back", post(back))
        .route("/sessions/:id/forward", post(forward))
        .route("/sessions/:id/restart", post(restart))
        .route("/stats", get(stats))
}

async fn start_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<StartPractice>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let view = practice::start(&state, user.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, SuccessResponse::ok(view)))
}

async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let view = practice::view(&state, parse_id(&id)?, user.as_ref())?;
    Ok(SuccessResponse::ok(view))
}

async fn delete_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    practice::delete(&state, parse_id(&id)?, user.as_ref())?;
    Ok(SuccessResponse::ok(DeletedResponse { deleted: true }))
}

async fn answer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let response = practice::answer(&state, parse_id(&id)?, user.as_ref(), &payload.answer)?;
    Ok(SuccessResponse::ok(response))
}

async fn advance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(practice::advance(&state, parse_id(&id)?, user.as_ref())?))
}

async fn back(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(practice::back(&state, parse_id(&id)?, user.as_ref())?))
}

async fn forward(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(practice::forward(&state, parse_id(&id)?, user.as_ref())?))
}

async fn restart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(practice::restart(&state, parse_id(&id)?, user.as_ref())?))
}

async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &headers).await?;
    let lecture_ids: Vec<String> = query
        .lecture_ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    let top = practice::stats(&state, &user, &lecture_ids).await?;
    Ok(SuccessResponse::ok(top))
}
