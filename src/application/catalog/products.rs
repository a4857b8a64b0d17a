use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use uuid::Uuid;

use crate::application::media::{ImagePayload, MediaError, MediaStore};
use crate::application::repos::{
    CreateProductParams, ProductsRepo, ProductsWriteRepo, RepoError,
};
use crate::cache::{CacheKey, CatalogCache};
use crate::domain::entities::{ProductImage, ProductRecord, main_image_for};

/// Upload cap per creation request.
pub const MAX_PRODUCT_IMAGES: usize = 8;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("product not found")]
    NotFound,
    #[error("at most {limit} images per product")]
    TooManyImages { limit: usize },
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
    pub main_image_index: Option<usize>,
    pub images: Vec<ImagePayload>,
}

#[derive(Clone)]
pub struct ProductService {
    reader: Arc<dyn ProductsRepo>,
    writer: Arc<dyn ProductsWriteRepo>,
    media: Arc<dyn MediaStore>,
    cache: CatalogCache,
}

impl ProductService {
    pub fn new(
        reader: Arc<dyn ProductsRepo>,
        writer: Arc<dyn ProductsWriteRepo>,
        media: Arc<dyn MediaStore>,
        cache: CatalogCache,
    ) -> Self {
        Self {
            reader,
            writer,
            media,
            cache,
        }
    }

    /// All products, newest first, served from cache when possible.
    pub async fn list(&self) -> Result<Vec<ProductRecord>, ProductError> {
        if let Some(cached) = self
            .cache
            .try_get::<Vec<ProductRecord>>(&CacheKey::Products)
            .await
        {
            return Ok(cached);
        }

        let products = self.reader.list_products().await?;
        self.cache.put(&CacheKey::Products, &products).await;
        Ok(products)
    }

    /// One product by id, cached under its own key and registered for the
    /// invalidation sweep.
    pub async fn get(&self, id: Uuid) -> Result<ProductRecord, ProductError> {
        let key = CacheKey::Product(id);
        if let Some(cached) = self.cache.try_get::<ProductRecord>(&key).await {
            return Ok(cached);
        }

        let product = self
            .reader
            .find_product(id)
            .await?
            .ok_or(ProductError::NotFound)?;
        self.cache.put(&key, &product).await;
        Ok(product)
    }

    /// Upload every image, then persist, then invalidate.
    ///
    /// Uploads run concurrently and all must succeed before the record is
    /// written; a failed upload therefore never leaves a partial product.
    pub async fn create(&self, command: CreateProductCommand) -> Result<ProductRecord, ProductError> {
        let CreateProductCommand {
            name,
            category_id,
            price,
            description,
            material,
            color,
            main_image_index,
            images,
        } = command;

        let name = name.trim().to_string();
        ensure_non_empty(&name, "name")?;
        if !price.is_finite() || price < 0.0 {
            return Err(ProductError::ConstraintViolation("price"));
        }
        if images.len() > MAX_PRODUCT_IMAGES {
            return Err(ProductError::TooManyImages {
                limit: MAX_PRODUCT_IMAGES,
            });
        }

        let uploads = images.into_iter().map(|payload| self.media.upload(payload));
        let stored = try_join_all(uploads).await?;
        let images: Vec<ProductImage> = stored
            .into_iter()
            .map(|stored| ProductImage {
                url: stored.url,
                asset_id: stored.asset_id,
            })
            .collect();
        let main_image = main_image_for(&images, main_image_index);

        let product = self
            .writer
            .create_product(CreateProductParams {
                name,
                category_id,
                price,
                description,
                material,
                color,
                images,
                main_image,
            })
            .await?;
        self.cache.invalidate_products().await;
        Ok(product)
    }

    /// Destroy the stored images first; the record only goes away once the
    /// object store has released every asset.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        let product = self
            .reader
            .find_product(id)
            .await?
            .ok_or(ProductError::NotFound)?;

        let destroys = product
            .images
            .iter()
            .map(|image| self.media.destroy(&image.asset_id));
        try_join_all(destroys).await?;

        self.writer.delete_product(id).await?;
        self.cache.invalidate_products().await;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::ConstraintViolation(field));
    }
    Ok(())
}
