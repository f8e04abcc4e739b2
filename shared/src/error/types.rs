//! AppError and the unified API response envelope

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ErrorCode;

/// Application error: a cause code plus a message safe for a spoken response
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    /// Create an error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Create an error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    // ========== Convenient constructors ==========

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error's code
    pub fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound
            | ErrorCode::RestaurantNotFound
            | ErrorCode::CallbackNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists
            | ErrorCode::AlreadyResolved
            | ErrorCode::SlotUnavailable
            | ErrorCode::InsufficientCapacity => StatusCode::CONFLICT,
            ErrorCode::InternalError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Everything else is caller-correctable input
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Unified API response envelope
///
/// `error_code` carries the wire name the dialogue engine matches on;
/// success responses put their payload in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error_code: None,
            message: None,
            data: Some(data),
        }
    }

    /// 错误响应
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            error_code: Some(err.code),
            message: Some(err.message.clone()),
            data: None,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::response::IntoResponse;

        let status = self.status_code();
        let body = ApiResponse::<()>::error(&self);
        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"success":false,"error_code":"INTERNAL_ERROR","message":"Internal error"}"#
                .to_string()
        });

        axum::http::Response::builder()
            .status(status)
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(json))
            .unwrap_or_else(|_| {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            })
    }
}
