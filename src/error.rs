use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::database::DbError;
use crate::result::{ErrorDetail, error_response};

#[derive(Debug, Error)]
pub enum AppError {
    /// Body could not be parsed or failed validation
    #[error("{message}")]
    InvalidInput {
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// Bad credentials, or a bad, expired or revoked token
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate username or email, or any other unique violation
    #[error("{0}")]
    Conflict(String),

    /// Store, cache or hashing failure. `detail` is logged, never returned.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        AppError::Unauthenticated(message.into())
    }

    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::InvalidInput { message, errors } => {
                tracing::debug!("Invalid input: {}", message);
                error_response(status, &message, errors).into_response()
            }
            AppError::Internal { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                error_response(status, &message, Vec::new()).into_response()
            }
            AppError::Unauthenticated(message) => {
                tracing::info!("Authentication failed: {}", message);
                error_response(status, &message, Vec::new()).into_response()
            }
            AppError::NotFound(message) | AppError::Conflict(message) => {
                error_response(status, &message, Vec::new()).into_response()
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound("Resource not found".into()),
            DbError::UniqueViolation { constraint } => {
                let message = match constraint.as_deref() {
                    Some(c) if c.contains("username") => "Username already taken",
                    Some(c) if c.contains("email") => "Email already taken",
                    _ => "Resource already exists",
                };
                AppError::Conflict(message.into())
            }
            DbError::ForeignKeyViolation { constraint } => AppError::InvalidInput {
                message: "Invalid reference to related resource".into(),
                errors: constraint
                    .map(|c| vec![ErrorDetail::message(format!("violates {}", c))])
                    .unwrap_or_default(),
            },
            DbError::Other(e) => AppError::internal("Database error", e),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::internal("Cache error", err)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::internal("Failed to process password", err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput {
            message: "Invalid input".into(),
            errors: vec![ErrorDetail::message(rejection.body_text())],
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput {
            message: "Invalid query parameters".into(),
            errors: vec![ErrorDetail::message(rejection.body_text())],
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput {
            message: "Invalid path parameter".into(),
            errors: vec![ErrorDetail::message(rejection.body_text())],
        }
    }
}

/// Flattens field-level validation failures into envelope details, sorted by field.
pub fn validation_details(errs: &ValidationErrors) -> Vec<ErrorDetail> {
    let mut errors: Vec<ErrorDetail> = errs
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", e.code));
                ErrorDetail::field(field.to_string(), message)
            })
        })
        .collect();
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}

impl From<ValidationErrors> for AppError {
    fn from(errs: ValidationErrors) -> Self {
        AppError::InvalidInput {
            message: "Validation failed".into(),
            errors: validation_details(&errs),
        }
    }
}
