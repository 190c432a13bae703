use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::{BLACKLIST_MARKER, blacklist_key, otp_key};
use crate::cache::{CacheResult, SessionCache};

/// Redis-backed session cache. Each call takes a multiplexed connection from the client.
#[derive(Clone)]
pub struct RedisSessionCache {
    redis: Arc<RedisClient>,
}

impl RedisSessionCache {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    /// Round-trips a PING, used once at startup.
    pub async fn ping(&self) -> CacheResult<String> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async(&mut conn).await
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn blacklist_token(&self, token: &str, ttl: Duration) -> CacheResult<()> {
        let millis = ttl.as_millis() as u64;
        if millis == 0 {
            return Ok(());
        }

        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn
            .pset_ex(blacklist_key(token), BLACKLIST_MARKER, millis)
            .await?;
        tracing::debug!("Token blacklisted for {} ms", millis);

        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> CacheResult<bool> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(blacklist_key(token)).await?;

        Ok(value.as_deref() == Some(BLACKLIST_MARKER))
    }

    async fn store_otp(&self, email: &str, otp: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(otp_key(email), otp, ttl.as_secs()).await?;

        Ok(())
    }

    async fn get_otp(&self, email: &str) -> CacheResult<Option<String>> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        conn.get(otp_key(email)).await
    }

    async fn remove_otp(&self, email: &str) -> CacheResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.del(otp_key(email)).await?;

        Ok(())
    }
}
