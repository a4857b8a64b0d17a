//! API handlers organized by resource type.
//!
//! Each submodule contains handlers for a specific resource. Helper functions
//! for error conversion are defined here and shared across modules.

mod auth;
mod categories;
mod health;
mod products;
mod templates;

pub use auth::*;
pub use categories::*;
pub use health::*;
pub use products::*;
pub use templates::*;

// ----- Shared error conversions -----

use axum::http::StatusCode;
use uuid::Uuid;

use crate::application::catalog::categories::CategoryError;
use crate::application::catalog::products::ProductError;
use crate::application::catalog::templates::TemplateError;
use crate::application::media::MediaError;
use crate::application::repos::RepoError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn media_to_api(err: MediaError) -> ApiError {
    ApiError::new(
        StatusCode::BAD_GATEWAY,
        codes::MEDIA,
        "Image storage operation failed",
        Some(err.to_string()),
    )
}

pub(crate) fn category_to_api(err: CategoryError) -> ApiError {
    match err {
        CategoryError::ConstraintViolation(field) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid category",
            Some(field.to_string()),
        ),
        CategoryError::NotFound => ApiError::not_found("category not found"),
        CategoryError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn product_to_api(err: ProductError) -> ApiError {
    match err {
        ProductError::ConstraintViolation(field) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid product",
            Some(field.to_string()),
        ),
        ProductError::NotFound => ApiError::not_found("product not found"),
        ProductError::TooManyImages { limit } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Too many images",
            Some(format!("limit is {limit} images per product")),
        ),
        ProductError::Media(media) => media_to_api(media),
        ProductError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn template_to_api(err: TemplateError) -> ApiError {
    match err {
        TemplateError::ConstraintViolation(field) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid template",
            Some(field.to_string()),
        ),
        TemplateError::NotFound => ApiError::not_found("template not found"),
        TemplateError::Repo(repo) => repo_to_api(repo),
    }
}

/// Parse a path segment as a UUID, rejecting malformed identifiers before
/// any store access.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|err| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid identifier",
            Some(format!("{entity} id `{raw}`: {err}")),
        )
    })
}
