//! Authentication flow: login, registration, token refresh, logout and the
//! OTP-based password reset.
//!
//! State lives in two places that are never updated together: the user table
//! (through [`UserRepository`]) and the session cache (blacklist and OTP codes).

use std::sync::Arc;
use std::time::Duration;

use crate::cache::SessionCache;
use crate::database::UserRepository;
use crate::database::models::{NewUser, UserEntity, user::DEFAULT_ROLE};
use crate::error::AppError;
use crate::utils::{
    Claims, IssuedToken, TokenIssuer, TokenKind, generate_otp, hash_password, verify_password,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug)]
pub struct LoginOutcome {
    pub user: UserEntity,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Registration input after request validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub employee_id: Option<i32>,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn SessionCache>,
    tokens: Arc<TokenIssuer>,
    bcrypt_cost: u32,
    otp_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn SessionCache>,
        tokens: Arc<TokenIssuer>,
        bcrypt_cost: u32,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            users,
            cache,
            tokens,
            bcrypt_cost,
            otp_ttl,
        }
    }

    /// `identifier` is a username or an email. Unknown users and wrong
    /// passwords produce the same error.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let access = self
            .tokens
            .issue(user.user_id, &user.username, TokenKind::Access)?;
        let refresh = self
            .tokens
            .issue(user.user_id, &user.username, TokenKind::Refresh)?;

        tracing::info!("User {} logged in", user.user_id);
        Ok(LoginOutcome {
            user,
            access,
            refresh,
        })
    }

    /// Existence is checked with two queries before the insert. A concurrent
    /// registration that slips between them hits the unique index and still
    /// surfaces as a conflict.
    pub async fn register(&self, input: Registration) -> Result<UserEntity, AppError> {
        if self.users.username_exists(&input.username).await? {
            return Err(AppError::Conflict("Username already taken".into()));
        }
        if self.users.email_exists(&input.email).await? {
            return Err(AppError::Conflict("Email already taken".into()));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;

        let user = self
            .users
            .create(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: input
                    .role
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
                employee_id: input.employee_id,
            })
            .await?;

        Ok(user)
    }

    /// Mints a new access token. The refresh token is reused as-is.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, AppError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        if self.cache.is_blacklisted(refresh_token).await? {
            return Err(AppError::unauthenticated("Refresh token revoked"));
        }

        let user_id = claims.user_id()?;
        self.tokens.issue(user_id, &claims.name, TokenKind::Access)
    }

    /// Gate for protected routes: blacklist first, then signature and expiry.
    pub async fn authenticate(&self, access_token: &str) -> Result<Claims, AppError> {
        if self.cache.is_blacklisted(access_token).await? {
            return Err(AppError::unauthenticated("Token has been revoked"));
        }
        self.tokens.verify(access_token, TokenKind::Access)
    }

    /// Revokes only the presented access token, for as long as it would
    /// otherwise stay valid.
    pub async fn logout(&self, access_token: &str, claims: &Claims) -> Result<(), AppError> {
        self.cache
            .blacklist_token(access_token, claims.remaining_ttl())
            .await?;
        tracing::info!("User {} logged out", claims.sub);
        Ok(())
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<UserEntity, AppError> {
        self.users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::unauthenticated("User no longer exists"))
    }

    pub async fn send_reset_otp(&self, email: &str) -> Result<(), AppError> {
        if self.users.find_by_email(email).await?.is_none() {
            return Err(AppError::NotFound("Email not found".into()));
        }

        let otp = generate_otp();
        self.cache.store_otp(email, &otp, self.otp_ttl).await?;

        // No delivery channel is wired up; the code only reaches debug logs.
        tracing::debug!("Password reset OTP for {}: {}", email, otp);
        Ok(())
    }

    /// Checks a code without consuming it.
    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<(), AppError> {
        let stored = self
            .cache
            .get_otp(email)
            .await?
            .ok_or_else(|| AppError::invalid_input("OTP expired or not found"))?;

        if stored != otp {
            return Err(AppError::invalid_input("Invalid OTP"));
        }
        Ok(())
    }

    /// Overwrites the password hash, then removes the code so it cannot be replayed.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.verify_reset_otp(email, otp).await?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let password_hash = hash_password(new_password, self.bcrypt_cost)?;
        self.users
            .update_password(user.user_id, &password_hash)
            .await?;
        self.cache.remove_otp(email).await?;

        tracing::info!("Password reset for user {}", user.user_id);
        Ok(())
    }
}
