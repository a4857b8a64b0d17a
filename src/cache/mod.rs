//! Cache-aside layer over a remote key-value store.
//!
//! Read paths resolve a deterministic key, try the cache, and fall back to
//! the entity store on a miss or any cache fault; write paths delete the
//! affected keys before the response goes out. The backend is optional: a
//! process without a configured (or reachable) cache serves every read
//! directly from the store.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! url = "redis://127.0.0.1:6379"
//! ttl_seconds = 300
//! ```

mod keys;
mod layer;
mod store;

pub use keys::{CacheKey, PRODUCT_KEY_INDEX};
pub use layer::CatalogCache;
pub use store::{CacheError, CacheStore};
