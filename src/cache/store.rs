//! Backend contract for the remote cache.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a cache backend.
///
/// None of these reach a client; the layer above logs them and degrades to
/// the entity store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache backend unreachable: {0}")]
    Unreachable(String),
}

impl CacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn unreachable(err: impl std::fmt::Display) -> Self {
        Self::Unreachable(err.to_string())
    }
}

/// Remote key-value operations the cache-aside layer relies on.
///
/// `track`/`tracked` maintain a registry set of live keys so invalidation
/// can sweep per-record entries on stores without scan support.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;

    async fn track(&self, index: &str, key: &str) -> Result<(), CacheError>;

    async fn tracked(&self, index: &str) -> Result<Vec<String>, CacheError>;
}
