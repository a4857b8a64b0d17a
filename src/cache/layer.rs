//! Get-or-populate front for catalog reads.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::keys::{CacheKey, PRODUCT_KEY_INDEX};
use super::store::CacheStore;

const METRIC_CACHE_HIT: &str = "telaio_cache_hit_total";
const METRIC_CACHE_MISS: &str = "telaio_cache_miss_total";
const METRIC_CACHE_ERROR: &str = "telaio_cache_error_total";
const METRIC_CACHE_INVALIDATE: &str = "telaio_cache_invalidate_total";

/// Cache-aside front over an optional backend.
///
/// `None` for the store means the process started without a usable cache;
/// every read then misses quietly and every write is a no-op. Backend faults
/// are logged and absorbed so the caller can always continue to the entity
/// store.
#[derive(Clone)]
pub struct CatalogCache {
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    /// A cache that answers every read with a miss and ignores writes.
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Fetch and deserialize the entry under `key`. Any fault, including a
    /// payload that no longer deserializes, counts as a miss.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let store = self.store.as_ref()?;
        let rendered = key.render();
        match store.get(&rendered).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    counter!(METRIC_CACHE_HIT, "family" => key.family()).increment(1);
                    Some(value)
                }
                Err(err) => {
                    warn!(
                        target: "telaio::cache",
                        key = %rendered,
                        error = %err,
                        "discarding malformed cache payload"
                    );
                    counter!(METRIC_CACHE_MISS, "family" => key.family()).increment(1);
                    None
                }
            },
            Ok(None) => {
                counter!(METRIC_CACHE_MISS, "family" => key.family()).increment(1);
                None
            }
            Err(err) => {
                warn!(
                    target: "telaio::cache",
                    key = %rendered,
                    error = %err,
                    "cache read failed; serving from the store"
                );
                counter!(METRIC_CACHE_ERROR, "family" => key.family()).increment(1);
                None
            }
        }
    }

    /// Serialize and store `value` under `key` with the configured TTL.
    ///
    /// A per-product entry is also registered in `products:index` so later
    /// invalidation can sweep it.
    pub async fn put<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let rendered = key.render();
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    target: "telaio::cache",
                    key = %rendered,
                    error = %err,
                    "failed to serialize cache payload"
                );
                return;
            }
        };
        if let Err(err) = store.set(&rendered, &payload, self.ttl).await {
            warn!(target: "telaio::cache", key = %rendered, error = %err, "cache write failed");
            counter!(METRIC_CACHE_ERROR, "family" => key.family()).increment(1);
            return;
        }
        if matches!(key, CacheKey::Product(_)) {
            if let Err(err) = store.track(PRODUCT_KEY_INDEX, &rendered).await {
                warn!(
                    target: "telaio::cache",
                    key = %rendered,
                    error = %err,
                    "failed to register cache key"
                );
            }
        }
    }

    /// Drop the categories aggregate.
    pub async fn invalidate_categories(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let keys = vec![CacheKey::Categories.render()];
        if let Err(err) = store.delete(&keys).await {
            warn!(target: "telaio::cache", error = %err, "cache invalidation failed");
            counter!(METRIC_CACHE_ERROR, "family" => "categories").increment(1);
            return;
        }
        counter!(METRIC_CACHE_INVALIDATE, "family" => "categories").increment(1);
    }

    /// Drop the products aggregate, every registered per-product entry, and
    /// the registry itself.
    ///
    /// A registry read failure narrows the sweep to the aggregate; TTL still
    /// bounds whatever the sweep could not see.
    pub async fn invalidate_products(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let mut keys = vec![CacheKey::Products.render()];
        match store.tracked(PRODUCT_KEY_INDEX).await {
            Ok(mut tracked) => keys.append(&mut tracked),
            Err(err) => {
                warn!(target: "telaio::cache", error = %err, "failed to read cache key registry");
                counter!(METRIC_CACHE_ERROR, "family" => "products").increment(1);
            }
        }
        keys.push(PRODUCT_KEY_INDEX.to_string());
        if let Err(err) = store.delete(&keys).await {
            warn!(target: "telaio::cache", error = %err, "cache invalidation failed");
            counter!(METRIC_CACHE_ERROR, "family" => "products").increment(1);
            return;
        }
        counter!(METRIC_CACHE_INVALIDATE, "family" => "products").increment(1);
    }
}
