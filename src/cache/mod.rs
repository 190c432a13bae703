// Session cache: token blacklist and password-reset codes.

use std::time::Duration;

use async_trait::async_trait;

pub mod keys;
pub mod operations;

pub use operations::session::RedisSessionCache;

pub type CacheResult<T> = Result<T, redis::RedisError>;

/// Key-value store with per-key expiry backing the auth flow.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Marks `token` as revoked until `ttl` elapses. A zero `ttl` writes nothing.
    async fn blacklist_token(&self, token: &str, ttl: Duration) -> CacheResult<()>;

    /// A missing key means "not blacklisted".
    async fn is_blacklisted(&self, token: &str) -> CacheResult<bool>;

    async fn store_otp(&self, email: &str, otp: &str, ttl: Duration) -> CacheResult<()>;

    async fn get_otp(&self, email: &str) -> CacheResult<Option<String>>;

    async fn remove_otp(&self, email: &str) -> CacheResult<()>;
}
