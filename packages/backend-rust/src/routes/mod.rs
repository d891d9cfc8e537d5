mod assets;
mod flashcards;
mod health;
mod lookup;
mod practice;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use uuid::Uuid;

use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/practice", practice::router())
        .nest("/api/tests", flashcards::router())
        .nest("/api/lectures", words::router())
        .nest("/api/assets", assets::router())
        .nest("/api", lookup::router())
        .fallback(fallback_handler)
        .with_state(state)
}

/// Session and draft ids; malformed ids are reported like unknown ones
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(format!("Không tìm thấy {raw}")))
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Không tìm thấy đường dẫn").into_response()
}
