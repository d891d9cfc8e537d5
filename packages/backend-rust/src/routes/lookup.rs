use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::optional_user;
use crate::response::{AppError, SuccessResponse};
use crate::routes::parse_id;
use crate::services::dictionary::lookup_dictionary;
use crate::services::suggest::run_suggest;
use crate::services::translate::translate_texts;
use crate::state::AppState;

const CLIENT_ID_HEADER: &str = "x-client-id";

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    texts: Vec<String>,
    #[serde(default = "default_target")]
    target: String,
}

fn default_target() -> String {
    "vi".to_string()
}

#[derive(Serialize)]
struct TranslateResponse {
    translations: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestQuery {
    #[serde(default)]
    text: String,
    client_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dictionary/:term", get(dictionary))
        .route("/translate", post(translate))
        .route("/suggest", get(suggest))
        .route("/suggest/audio/:draftId", get(audio_draft))
}

async fn dictionary(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = lookup_dictionary(state.dictionary().as_ref(), &term).await;
    Ok(SuccessResponse::ok(result))
}

/// Always answers 200; translation failures come back as an empty list
async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<TranslateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let target = payload.target.trim().to_ascii_lowercase();
    if target != "vi" && target != "en" {
        return Err(AppError::validation("Ngôn ngữ đích phải là vi hoặc en"));
    }
    let translations = translate_texts(state.translator().as_ref(), &payload.texts, &target).await;
    Ok(SuccessResponse::ok(TranslateResponse { translations }))
}

/// Requests are superseded per client: the explicit client id, else the
/// signed-in user. Anonymous callers without a client id are never superseded.
async fn suggest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SuggestQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client = query
        .client_id
        .or_else(|| {
            headers
                .get(CLIENT_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let ticket = match client {
        Some(id) => state.suggest().issue(&format!("client:{id}")),
        None => match optional_user(&state, &headers).await {
            Some(user) => state.suggest().issue(&format!("user:{}", user.id)),
            None => state.suggest().detached(),
        },
    };
    let outcome = run_suggest(&state, &ticket, &query.text).await;
    Ok(SuccessResponse::ok(outcome))
}

async fn audio_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&draft_id)?;
    let bytes = state
        .audio_drafts()
        .with(&id, |bytes| bytes.clone())
        .ok_or_else(|| AppError::not_found("Không tìm thấy bản ghi âm tạm"))?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], Body::from(bytes)).into_response())
}
