//! Catalog services: cache-aside reads plus admin writes.

pub mod categories;
pub mod products;
pub mod templates;
