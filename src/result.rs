use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ErrorDetail {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Pagination info for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

pub type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn success_response<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: T,
) -> ApiResult<T> {
    (
        status,
        Json(ApiResponse {
            status: "success".into(),
            code: status.as_u16(),
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
            meta: None,
        }),
    )
}

pub fn message_response(status: StatusCode, message: &str) -> ApiResult<()> {
    (
        status,
        Json(ApiResponse {
            status: "success".into(),
            code: status.as_u16(),
            message: message.into(),
            data: None,
            errors: Vec::new(),
            meta: None,
        }),
    )
}

pub fn list_response<T: Serialize>(message: &str, data: Vec<T>, meta: Meta) -> ApiResult<Vec<T>> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            status: "success".into(),
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
            meta: Some(meta),
        }),
    )
}

pub fn error_response(
    status: StatusCode,
    message: &str,
    errors: Vec<ErrorDetail>,
) -> ApiResult<()> {
    (
        status,
        Json(ApiResponse {
            status: "error".into(),
            code: status.as_u16(),
            message: message.into(),
            data: None,
            errors,
            meta: None,
        }),
    )
}
