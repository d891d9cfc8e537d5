use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::{optional_user, require_user};
use crate::response::{AppError, SuccessResponse};
use crate::services::words::{self, ReorderRequest, WordForm};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:lectureId/words", get(list_words).post(create_word))
        .route("/:lectureId/order", put(reorder_words))
        .route(
            "/:lectureId/words/:wordId",
            put(update_word).delete(delete_word),
        )
}

async fn list_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(lecture_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let listing = words::list(&state, &lecture_id, user.as_ref(), &query.q).await?;
    Ok(SuccessResponse::ok(listing))
}

async fn create_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(lecture_id): Path<String>,
    Json(form): Json<WordForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &headers).await?;
    let row = words::create(&state, &lecture_id, &user, form).await?;
    Ok((StatusCode::CREATED, SuccessResponse::ok(row)))
}

async fn update_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((lecture_id, word_id)): Path<(String, String)>,
    Json(form): Json<WordForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &headers).await?;
    let row = words::update(&state, &lecture_id, &word_id, &user, form).await?;
    Ok(SuccessResponse::ok(row))
}

async fn delete_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((lecture_id, word_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &headers).await?;
    let outcome = words::delete(&state, &lecture_id, &word_id, &user).await?;
    Ok(SuccessResponse::ok(outcome))
}

async fn reorder_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(lecture_id): Path<String>,
    Json(payload): Json<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = optional_user(&state, &headers).await;
    let outcome = words::reorder(&state, &lecture_id, user.as_ref(), payload).await?;
    Ok(SuccessResponse::ok(outcome))
}
