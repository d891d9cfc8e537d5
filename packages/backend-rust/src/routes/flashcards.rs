use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::optional_user;
use crate::response::{AppError, SuccessResponse};
use crate::routes::parse_id;
use crate::services::flashcard_tests::{self, StartTest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    answer: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_test))
        .route("/:id", get(get_test))
        .route("/:id/answer", put(set_answer))
        .route("/:id/previous", post(previous))
        .route("/:id/next", post(next))
        .route("/:id/flip", post(flip))
        .route("/:id/finish", post(finish))
        .route("/:id/reset", post(reset))
}

async fn start_test(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<StartTest>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let view = flashcard_tests::start(&state, user.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, SuccessResponse::ok(view)))
}

async fn get_test(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::view(&state, parse_id(&id)?, user.as_ref())?))
}

async fn set_answer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let view = flashcard_tests::set_answer(&state, parse_id(&id)?, user.as_ref(), &payload.answer)?;
    Ok(SuccessResponse::ok(view))
}

async fn previous(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::previous(&state, parse_id(&id)?, user.as_ref())?))
}

async fn next(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::next(&state, parse_id(&id)?, user.as_ref())?))
}

async fn flip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::flip(&state, parse_id(&id)?, user.as_ref())?))
}

async fn finish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::finish(&state, parse_id(&id)?, user.as_ref())?))
}

async fn reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    Ok(SuccessResponse::ok(flashcard_tests::reset(&state, parse_id(&id)?, user.as_ref())?))
}
