//! Error types for the studio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{backend::BackendError, calendar::CalendarError, storage::StorageError};

/// Application error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    BackendFailure = 3,
    NoSuchData = 4,
    Duplicate = 5,
    BadValue = 6,
    StorageFailure = 7,
    PartialSave = 8,
    RuleViolation = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Additions reached the store but the removals did not
    #[error("Partial save: {message}")]
    PartialSave {
        message: String,
        committed: Vec<NaiveDate>,
    },
}

impl From<CalendarError> for AppError {
    fn from(e: CalendarError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        AppError::Validation(messages.join(" "))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Dates already written when a save stopped half way
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<Vec<NaiveDate>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut committed = None;
        let (status, code, message) = match self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Backend(e) => match e {
                BackendError::UniqueViolation { message, .. } => {
                    (StatusCode::CONFLICT, ErrorCode::Duplicate, message)
                }
                BackendError::Decode(msg) => {
                    tracing::error!("Failed to decode backend row: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::BackendFailure,
                        "Internal server error".to_string(),
                    )
                }
                other => {
                    tracing::warn!("Backend error: {}", other);
                    (StatusCode::BAD_GATEWAY, ErrorCode::BackendFailure, other.to_string())
                }
            },
            AppError::Storage(e) => {
                tracing::warn!("Storage error: {}", e);
                let status = match e {
                    StorageError::AlreadyExists(_) => StatusCode::CONFLICT,
                    StorageError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, ErrorCode::StorageFailure, e.to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::RuleViolation, msg)
            }
            AppError::PartialSave { message, committed: dates } => {
                committed = Some(dates);
                (StatusCode::BAD_GATEWAY, ErrorCode::PartialSave, message)
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            committed,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
