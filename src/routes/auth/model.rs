use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::models::UserEntity;
use crate::services::auth::Registration;

pub const TOKEN_TYPE: &str = "Bearer";

/// `username` accepts either a username or an email.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
    pub user: UserEntity,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username is required (max 50 characters)"))]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<String>,
    #[validate(range(min = 1, message = "employee_id must be a positive id"))]
    pub employee_id: Option<i32>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password: req.password,
            role: req.role,
            employee_id: req.employee_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "otp must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "otp must be 6 digits"))]
    pub otp: String,
    #[validate(length(min = 6, message = "new_password must be at least 6 characters"))]
    pub new_password: String,
}
