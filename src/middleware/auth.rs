use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::{AppState, error::AppError, utils::Claims};

/// Verified caller, inserted as a request extension for protected handlers.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub claims: Claims,
    /// Raw bearer token, kept so logout can blacklist it.
    pub token: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.map_err(|_| AppError::unauthenticated("Missing or malformed bearer token"))?;
    let token = bearer.token().to_string();

    let claims = state.auth.authenticate(&token).await?;

    request
        .extensions_mut()
        .insert(AuthSession { claims, token });
    Ok(next.run(request).await)
}
