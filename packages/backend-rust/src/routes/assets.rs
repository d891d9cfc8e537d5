use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::auth::require_user;
use crate::response::{AppError, SuccessResponse};
use crate::services::assets::{is_known_bucket, upload_asset};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct UploadQuery {
    name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:bucket", post(upload))
}

/// Raw request body upload; `?name=` supplies the extension
async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bucket): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    require_user(&state, &headers).await?;
    if !is_known_bucket(&bucket) {
        return Err(AppError::not_found(format!("Không có kho lưu trữ {bucket}")));
    }
    if body.is_empty() {
        return Err(AppError::validation("Tệp tải lên trống"));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "application/octet-stream");
    let name = query.name.unwrap_or_default();
    let stored = upload_asset(state.gateway().as_ref(), &bucket, &name, body, content_type).await?;
    Ok((StatusCode::CREATED, SuccessResponse::ok(stored)))
}
