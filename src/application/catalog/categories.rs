use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError,
};
use crate::cache::{CacheKey, CatalogCache};
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::{SlugError, derive_slug};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("category not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
    cache: CatalogCache,
}

impl CategoryService {
    pub fn new(
        reader: Arc<dyn CategoriesRepo>,
        writer: Arc<dyn CategoriesWriteRepo>,
        cache: CatalogCache,
    ) -> Self {
        Self {
            reader,
            writer,
            cache,
        }
    }

    /// All categories, name ascending, served from cache when possible.
    pub async fn list(&self) -> Result<Vec<CategoryRecord>, CategoryError> {
        if let Some(cached) = self
            .cache
            .try_get::<Vec<CategoryRecord>>(&CacheKey::Categories)
            .await
        {
            return Ok(cached);
        }

        let categories = self.reader.list_categories().await?;
        self.cache.put(&CacheKey::Categories, &categories).await;
        Ok(categories)
    }

    /// Create a category with a slug derived deterministically from its
    /// name. A slug collision surfaces as the store's duplicate error.
    pub async fn create(
        &self,
        command: CreateCategoryCommand,
    ) -> Result<CategoryRecord, CategoryError> {
        let CreateCategoryCommand { name, image } = command;

        let name = name.trim().to_string();
        ensure_non_empty(&name, "name")?;

        let slug = match derive_slug(&name) {
            Ok(slug) => slug,
            Err(SlugError::EmptyInput | SlugError::Unrepresentable { .. }) => {
                return Err(CategoryError::ConstraintViolation("name"));
            }
        };

        let image = image.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });

        let category = self
            .writer
            .create_category(CreateCategoryParams { name, slug, image })
            .await?;
        self.cache.invalidate_categories().await;
        Ok(category)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), CategoryError> {
        match self.writer.delete_category(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(CategoryError::NotFound),
            Err(err) => return Err(CategoryError::Repo(err)),
        }
        self.cache.invalidate_categories().await;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), CategoryError> {
    if value.trim().is_empty() {
        return Err(CategoryError::ConstraintViolation(field));
    }
    Ok(())
}
