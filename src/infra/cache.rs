//! Redis connection used for rate limiting and health probing.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::{Config, CACHE_HEALTH_KEY, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Redis wrapper around a multiplexed connection manager.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    /// Round-trip a key to confirm Redis is reachable.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: bool = conn.exists(CACHE_HEALTH_KEY).await.map_err(cache_error)?;
        Ok(())
    }

    /// Count a request against `identifier`'s fixed window.
    ///
    /// Returns `(current_count, is_allowed)`.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            // First hit opens the window
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
