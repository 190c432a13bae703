use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use super::model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    ResetPasswordRequest, SendOtpRequest, TOKEN_TYPE, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::{
    AppState,
    database::models::UserEntity,
    error::AppError,
    middleware::AuthSession,
    result::{ApiResult, message_response, success_response},
};

/// Unwraps the body and runs its validators.
fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    Ok(req)
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResult<LoginResponse>, AppError> {
    let req = validated(payload)?;
    let outcome = state.auth.login(req.username.trim(), &req.password).await?;

    Ok(success_response(
        StatusCode::OK,
        "Login successful",
        LoginResponse {
            token: outcome.access.token,
            refresh_token: outcome.refresh.token,
            token_type: TOKEN_TYPE,
            expires_at: outcome.access.expires_at,
            user: outcome.user,
        },
    ))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResult<UserEntity>, AppError> {
    let req = validated(payload)?;
    let user = state.auth.register(req.into()).await?;

    Ok(success_response(
        StatusCode::CREATED,
        "User registered successfully",
        user,
    ))
}

#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<ApiResult<RefreshResponse>, AppError> {
    let req = validated(payload)?;
    let access = state.auth.refresh(&req.refresh_token).await?;

    Ok(success_response(
        StatusCode::OK,
        "Token refreshed",
        RefreshResponse {
            token: access.token,
            token_type: TOKEN_TYPE,
            expires_at: access.expires_at,
        },
    ))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<ApiResult<()>, AppError> {
    state.auth.logout(&session.token, &session.claims).await?;
    Ok(message_response(StatusCode::OK, "Logout successful"))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<ApiResult<UserEntity>, AppError> {
    let user = state.auth.current_user(&session.claims).await?;
    Ok(success_response(StatusCode::OK, "Current user", user))
}

#[axum::debug_handler]
pub async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<ApiResult<()>, AppError> {
    let req = validated(payload)?;
    state.auth.send_reset_otp(req.email.trim()).await?;
    Ok(message_response(StatusCode::OK, "OTP sent"))
}

#[axum::debug_handler]
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<ApiResult<VerifyOtpResponse>, AppError> {
    let req = validated(payload)?;
    state
        .auth
        .verify_reset_otp(req.email.trim(), &req.otp)
        .await?;

    Ok(success_response(
        StatusCode::OK,
        "OTP verified",
        VerifyOtpResponse { valid: true },
    ))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<ApiResult<()>, AppError> {
    let req = validated(payload)?;
    state
        .auth
        .reset_password(req.email.trim(), &req.otp, &req.new_password)
        .await?;
    Ok(message_response(StatusCode::OK, "Password reset successful"))
}
