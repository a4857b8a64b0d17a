//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CategoryRecord, ProductImage, ProductRecord, TemplateRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProductParams {
    pub name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
    pub images: Vec<ProductImage>,
    pub main_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTemplateParams {
    pub name: String,
    pub display_name: String,
    pub product_name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// All categories, name ascending.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    /// Removes the category; `RepoError::NotFound` when no row matched.
    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    /// All products, newest first, with the category summary inlined.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError>;
}

#[async_trait]
pub trait ProductsWriteRepo: Send + Sync {
    async fn create_product(&self, params: CreateProductParams)
    -> Result<ProductRecord, RepoError>;

    /// Removes the product record only; object-store cleanup happens first
    /// in the service layer.
    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TemplatesRepo: Send + Sync {
    /// All templates, newest first, with the category summary inlined.
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, RepoError>;
}

#[async_trait]
pub trait TemplatesWriteRepo: Send + Sync {
    async fn create_template(
        &self,
        params: CreateTemplateParams,
    ) -> Result<TemplateRecord, RepoError>;

    async fn delete_template(&self, id: Uuid) -> Result<(), RepoError>;
}
