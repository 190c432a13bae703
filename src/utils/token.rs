use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user id
    pub name: String,    // username
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthenticated("Invalid token subject"))
    }

    /// Time left until `exp`, zero once expired.
    pub fn remaining_ttl(&self) -> Duration {
        let remaining_ms = self.exp * 1000 - Utc::now().timestamp_millis();
        Duration::from_millis(remaining_ms.max(0) as u64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Signs and checks HS256 tokens with one static secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.access_token_ttl(),
            config.refresh_token_ttl(),
        )
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(
        &self,
        user_id: i32,
        username: &str,
        kind: TokenKind,
    ) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, username, kind, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: i32,
        username: &str,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let exp = issued_at.timestamp() + self.ttl(kind).as_secs() as i64;
        let claims = Claims {
            sub: user_id.to_string(),
            name: username.to_string(),
            kind,
            iat: issued_at.timestamp(),
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal("Failed to generate token", e))?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    /// Signature, expiry, claim shape and token kind. Blacklisting is checked elsewhere.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::unauthenticated("Token has expired"),
                _ => AppError::unauthenticated("Invalid token"),
            })?
            .claims;

        // `exp == now` counts as expired so the blacklist TTL never outlives the token.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::unauthenticated("Token has expired"));
        }
        if claims.kind != expected {
            return Err(AppError::unauthenticated("Invalid token type"));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(
            secret,
            Duration::from_secs(15 * 60),
            Duration::from_secs(24 * 3600),
        )
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Unauthenticated(m) => m,
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[test]
    fn issued_access_token_verifies() {
        let issuer = issuer("test-secret");
        let issued = issuer.issue(7, "alice", TokenKind::Access).unwrap();

        let claims = issuer.verify(&issued.token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn refresh_token_lives_longer() {
        let issuer = issuer("test-secret");
        let issued = issuer.issue(7, "alice", TokenKind::Refresh).unwrap();
        let claims = issuer.verify(&issued.token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issuer("secret-1")
            .issue(1, "bob", TokenKind::Access)
            .unwrap();
        let err = issuer("secret-2")
            .verify(&issued.token, TokenKind::Access)
            .unwrap_err();
        assert_eq!(message(err), "Invalid token");
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer("test-secret");
        let issued = issuer
            .issue_at(
                1,
                "bob",
                TokenKind::Access,
                Utc::now() - ChronoDuration::hours(1),
            )
            .unwrap();
        let err = issuer.verify(&issued.token, TokenKind::Access).unwrap_err();
        assert_eq!(message(err), "Token has expired");
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issuer = issuer("test-secret");
        let refresh = issuer.issue(1, "bob", TokenKind::Refresh).unwrap();
        let err = issuer.verify(&refresh.token, TokenKind::Access).unwrap_err();
        assert_eq!(message(err), "Invalid token type");

        let access = issuer.issue(1, "bob", TokenKind::Access).unwrap();
        assert!(issuer.verify(&access.token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn token_missing_claims_is_rejected() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }
        let issuer = issuer("test-secret");
        let token = encode(
            &Header::default(),
            &Partial {
                sub: "1".into(),
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(issuer.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(
            issuer("test-secret")
                .verify("invalid.token.here", TokenKind::Access)
                .is_err()
        );
    }

    #[test]
    fn remaining_ttl_is_bounded_by_expiry() {
        let issuer = issuer("test-secret");
        let issued = issuer.issue(1, "bob", TokenKind::Access).unwrap();
        let claims = issuer.verify(&issued.token, TokenKind::Access).unwrap();
        let ttl = claims.remaining_ttl();
        assert!(ttl <= Duration::from_secs(15 * 60));
        assert!(ttl > Duration::from_secs(15 * 60 - 5));

        let expired = Claims {
            exp: Utc::now().timestamp() - 10,
            ..claims
        };
        assert_eq!(expired.remaining_ttl(), Duration::ZERO);
    }
}
