//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use tracing::debug;

use crate::cache::{CacheError, CacheStore};

/// Cache backend over a deadpool-redis pool.
///
/// `connect` round-trips a command before the store is handed to the cache
/// layer, so an unreachable backend degrades at startup instead of on the
/// first request.
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(CacheError::unreachable)?;
        let store = Self { pool };
        store.probe().await?;
        Ok(store)
    }

    async fn probe(&self) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await.map_err(CacheError::unreachable)?;
        let _: Option<String> = conn
            .get("telaio:probe")
            .await
            .map_err(CacheError::unreachable)?;
        debug!(target: "telaio::cache", "cache backend reachable");
        Ok(())
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool.get().await.map_err(CacheError::backend)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(CacheError::backend)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        // SETEX rejects a zero expiry.
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(CacheError::backend)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(keys).await.map_err(CacheError::backend)
    }

    async fn track(&self, index: &str, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.sadd::<_, _, ()>(index, key)
            .await
            .map_err(CacheError::backend)
    }

    async fn tracked(&self, index: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn().await?;
        let members: Vec<String> = conn.smembers(index).await.map_err(CacheError::backend)?;
        Ok(members)
    }
}
