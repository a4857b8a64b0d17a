//! Cache key definitions.
//!
//! Key strings are part of the deployed contract (dashboards and manual
//! `redis-cli` inspection rely on them), so they are rendered from one enum
//! instead of being spelled inline at call sites.

use std::fmt;

use uuid::Uuid;

/// Registry set listing the per-product keys currently live in the cache.
///
/// Product writes sweep the members of this set; no backend key-pattern
/// scan is ever issued.
pub const PRODUCT_KEY_INDEX: &str = "products:index";

/// Identifies one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Aggregate of all categories (`categories:all`).
    Categories,
    /// Aggregate of all products (`products:all`).
    Products,
    /// A single product (`product:{id}`).
    Product(Uuid),
}

impl CacheKey {
    /// Key family, used as the metric label.
    pub fn family(&self) -> &'static str {
        match self {
            CacheKey::Categories => "categories",
            CacheKey::Products => "products",
            CacheKey::Product(_) => "product",
        }
    }

    /// Render the backend key string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Categories => f.write_str("categories:all"),
            CacheKey::Products => f.write_str("products:all"),
            CacheKey::Product(id) => write!(f, "product:{id}"),
        }
    }
}
