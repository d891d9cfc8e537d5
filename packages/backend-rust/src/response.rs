use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tuvung_algo::{BuildError, ReorderError, SessionError, ValidationError};

use crate::gateway::GatewayError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn filter_active(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "FILTER_ACTIVE", message)
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            is_operational: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn operational(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            is_operational: true,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            tracing::error!(code = %self.code, error = %self.message, "internal error");
            "Lỗi máy chủ nội bộ".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}

pub fn json_error(
    status: StatusCode,
    code: impl Into<String>,
    message: impl Into<String>,
) -> AppError {
    AppError {
        status,
        code: code.into(),
        message: message.into(),
        is_operational: true,
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => AppError::not_found(format!("Không tìm thấy {what}")),
            GatewayError::Unauthenticated => {
                AppError::unauthorized("Phiên đăng nhập không hợp lệ")
            }
            other => {
                tracing::warn!(error = %other, "gateway call failed");
                AppError::gateway(other.to_string())
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptySequence | SessionError::Build(BuildError::EmptySelection) => {
                AppError::validation("Chưa chọn từ nào để luyện tập")
            }
            other => AppError::conflict(other.to_string()),
        }
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        AppError::from(SessionError::from(err))
    }
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Forbidden => AppError::forbidden("Bạn không có quyền chỉnh sửa khóa học này"),
            ReorderError::FilterActive => {
                AppError::filter_active("Hãy xóa ô tìm kiếm trước khi sắp xếp")
            }
            ReorderError::UnknownWord(id) => AppError::not_found(format!("Không tìm thấy từ {id}")),
            ReorderError::SameTarget => AppError::validation("Vị trí đích trùng với từ đang kéo"),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            AppError::from(ReorderError::FilterActive).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::from(ReorderError::FilterActive).code(), "FILTER_ACTIVE");
        assert_eq!(
            AppError::from(ReorderError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ValidationError::InvalidOrder("-1".into())).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::from(GatewayError::NotConfigured("SUPABASE_URL")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(BuildError::EmptySelection).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SessionError::Unanswered).status(),
            StatusCode::CONFLICT
        );
    }
}
