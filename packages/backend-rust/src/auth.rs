use axum::http::{header, HeaderMap};
use serde::Serialize;

use crate::gateway::GatewayError;
use crate::response::AppError;
use crate::state::AppState;

const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = get_cookie(headers, AUTH_COOKIE_NAME) {
        return Some(token);
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

/// Resolves the caller or fails with 401
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = extract_token(headers).ok_or_else(|| AppError::unauthorized("Vui lòng đăng nhập"))?;
    state.gateway().resolve_user(&token).await.map_err(|err| match err {
        GatewayError::Unauthenticated | GatewayError::NotFound(_) => {
            AppError::unauthorized("Phiên đăng nhập không hợp lệ")
        }
        other => AppError::from(other),
    })
}

/// Resolves the caller when a valid token is present; anonymous otherwise
pub async fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_token(headers)?;
    match state.gateway().resolve_user(&token).await {
        Ok(user) => Some(user),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unresolved token");
            None
        }
    }
}

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
