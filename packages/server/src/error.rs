use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{PageError, TagNameError};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `INVALID_TAG_NAME`,
    /// `NO_EARLIER_VERSION`, `TOKEN_MISSING`, `TOKEN_INVALID`, `NOT_FOUND`,
    /// `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "INVALID_TAG_NAME")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "tag name contains no valid characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// A tag name was empty after normalization, too long, or reserved.
    InvalidTagName(String),
    /// Revert target has no predecessor snapshot.
    NoEarlierVersion,
    TokenMissing,
    TokenInvalid,
    NotFound(String),
    Conflict(String),
    /// Store or invariant failure. Logged, never shown to the caller.
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidTagName(_) => StatusCode::BAD_REQUEST,
            AppError::TokenMissing | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoEarlierVersion | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidTagName(_) => "INVALID_TAG_NAME",
            AppError::NoEarlierVersion => "NO_EARLIER_VERSION",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn into_message(self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::InvalidTagName(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::NoEarlierVersion => {
                "No earlier version of this post exists to revert to".into()
            }
            AppError::TokenMissing => "Authorization token is missing".into(),
            AppError::TokenInvalid => "Authorization token is invalid or expired".into(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "An unexpected error occurred".into()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.code(),
            message: self.into_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TagNameError> for AppError {
    fn from(err: TagNameError) -> Self {
        AppError::InvalidTagName(err.to_string())
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::Validation(err.to_string())
    }
}
