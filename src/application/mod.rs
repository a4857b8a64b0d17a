//! Application services layer scaffolding.

pub mod access;
pub mod catalog;
pub mod error;
pub mod media;
pub mod repos;
