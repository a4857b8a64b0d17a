//! Telaio: a cache-accelerated product catalog backend.
//!
//! The crate is organized in three rings. [`domain`] holds the catalog
//! records and their invariants, [`application`] holds the services and the
//! traits they depend on, and [`infra`] supplies the Postgres, Redis, media
//! store, and HTTP implementations wired together by the binary.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
