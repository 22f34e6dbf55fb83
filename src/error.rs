use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;
use crate::services::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    ValidationError(ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Account locked: {0}")]
    AccountLocked(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AccountLocked(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        match self {
            AppError::ValidationError(errors) => HttpResponse::build(status_code)
                .json(ApiResponse::error_with_data(errors, &error_message)),
            _ => HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} {} not found", entity, id))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Storage error: {:#}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::StorageError(format!("{:#}", original_error)),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        log::error!("Password hashing error: {}", error);
        AppError::internal_server_error_message("Password hashing failed")
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        log::error!("Token error: {}", error);
        AppError::internal_server_error_message("Token generation failed")
    }
}
