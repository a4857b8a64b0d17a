//! Infrastructure adapters: persistence, cache backend, media client, HTTP.

pub mod cache;
pub mod db;
pub mod error;
pub mod http;
pub mod media;
pub mod telemetry;
