//! Error types for the equipment registry server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchEquipment = 4,
    BadValue = 5,
    Duplicate = 6,
    ReadFailure = 7,
    EncodeFailure = 8,
    UploadFailure = 9,
    WriteFailure = 10,
    NotifyFailure = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Existing records could not be fetched
    #[error("Registry read failed: {0}")]
    RegistryRead(String),

    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    #[error("Photo upload failed: {0}")]
    PhotoUpload(String),

    /// The record (or its id reservation) could not be written
    #[error("Registry write failed: {0}")]
    RegistryWrite(String),

    #[error("Notification failed: {0}")]
    Notify(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::NotFound(_) => ErrorCode::NoSuchEquipment,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Internal(_) => ErrorCode::Failure,
            AppError::RegistryRead(_) => ErrorCode::ReadFailure,
            AppError::QrEncode(_) => ErrorCode::EncodeFailure,
            AppError::PhotoUpload(_) => ErrorCode::UploadFailure,
            AppError::RegistryWrite(_) => ErrorCode::WriteFailure,
            AppError::Notify(_) => ErrorCode::NotifyFailure,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::RegistryRead(msg) => {
                tracing::error!("Registry read error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Could not read the equipment registry".to_string(),
                )
            }
            AppError::QrEncode(msg) => {
                tracing::error!("QR encoding error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not generate the QR code".to_string(),
                )
            }
            AppError::PhotoUpload(msg) => {
                tracing::error!("Photo upload error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Could not upload the photo".to_string(),
                )
            }
            AppError::RegistryWrite(msg) => {
                tracing::error!("Registry write error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Could not save the equipment record".to_string(),
                )
            }
            AppError::Notify(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
