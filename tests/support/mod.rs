//! Shared fixtures: in-memory catalog, cache, and media stores plus request
//! helpers for driving the full router.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use telaio::application::access::AdminAccess;
use telaio::application::catalog::categories::CategoryService;
use telaio::application::catalog::products::ProductService;
use telaio::application::catalog::templates::TemplateService;
use telaio::application::media::{ImagePayload, MediaError, MediaStore, StoredImage};
use telaio::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreateProductParams,
    CreateTemplateParams, ProductsRepo, ProductsWriteRepo, RepoError, TemplatesRepo,
    TemplatesWriteRepo,
};
use telaio::cache::{CacheError, CacheStore, CatalogCache};
use telaio::domain::entities::{
    CategoryRecord, CategorySummary, ProductImage, ProductRecord, TemplateRecord,
};
use telaio::infra::http::{self, ApiState};

pub const ADMIN_KEY: &str = "test-admin-key";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

// ----- In-memory catalog -----

/// Catalog store backed by vectors, counting reads so tests can assert
/// whether the cache absorbed a request.
#[derive(Default)]
pub struct MemoryCatalog {
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub products: Mutex<Vec<ProductRecord>>,
    pub templates: Mutex<Vec<TemplateRecord>>,
    pub category_reads: AtomicUsize,
    pub product_reads: AtomicUsize,
}

impl MemoryCatalog {
    pub fn category_reads(&self) -> usize {
        self.category_reads.load(Ordering::SeqCst)
    }

    pub fn product_reads(&self) -> usize {
        self.product_reads.load(Ordering::SeqCst)
    }

    pub async fn seed_category(&self, name: &str, slug: &str) -> CategoryRecord {
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            image: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.categories.lock().await.push(record.clone());
        record
    }

    pub async fn seed_product(
        &self,
        category: &CategoryRecord,
        name: &str,
        images: Vec<ProductImage>,
    ) -> ProductRecord {
        let main_image = images.first().map(|image| image.url.clone());
        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: summary_of(category),
            price: 249.0,
            description: String::new(),
            material: String::new(),
            color: String::new(),
            images,
            main_image,
            created_at: OffsetDateTime::now_utc(),
        };
        self.products.lock().await.insert(0, record.clone());
        record
    }
}

fn summary_of(category: &CategoryRecord) -> CategorySummary {
    CategorySummary {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        image: category.image.clone(),
    }
}

#[async_trait]
impl CategoriesRepo for MemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.category_reads.fetch_add(1, Ordering::SeqCst);
        let mut categories = self.categories.lock().await.clone();
        categories.sort_by_key(|category| category.name.to_lowercase());
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self
            .categories
            .lock()
            .await
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for MemoryCatalog {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().await;
        if categories.iter().any(|category| category.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".to_string(),
            });
        }
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            image: params.image,
            created_at: OffsetDateTime::now_utc(),
        };
        categories.push(record.clone());
        Ok(record)
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        if self
            .products
            .lock()
            .await
            .iter()
            .any(|product| product.category.id == id)
        {
            return Err(RepoError::InvalidInput {
                message: "category is referenced by products".to_string(),
            });
        }
        let mut categories = self.categories.lock().await;
        let before = categories.len();
        categories.retain(|category| category.id != id);
        if categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductsRepo for MemoryCatalog {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError> {
        self.product_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.lock().await.clone())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        self.product_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }
}

#[async_trait]
impl ProductsWriteRepo for MemoryCatalog {
    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let category = self
            .categories
            .lock()
            .await
            .iter()
            .find(|category| category.id == params.category_id)
            .cloned()
            .ok_or_else(|| RepoError::InvalidInput {
                message: "category does not exist".to_string(),
            })?;

        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: params.name,
            category: summary_of(&category),
            price: params.price,
            description: params.description,
            material: params.material,
            color: params.color,
            images: params.images,
            main_image: params.main_image,
            created_at: OffsetDateTime::now_utc(),
        };
        self.products.lock().await.insert(0, record.clone());
        Ok(record)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|product| product.id != id);
        if products.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TemplatesRepo for MemoryCatalog {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, RepoError> {
        Ok(self.templates.lock().await.clone())
    }
}

#[async_trait]
impl TemplatesWriteRepo for MemoryCatalog {
    async fn create_template(
        &self,
        params: CreateTemplateParams,
    ) -> Result<TemplateRecord, RepoError> {
        let category = self
            .categories
            .lock()
            .await
            .iter()
            .find(|category| category.id == params.category_id)
            .cloned()
            .ok_or_else(|| RepoError::InvalidInput {
                message: "category does not exist".to_string(),
            })?;

        let record = TemplateRecord {
            id: Uuid::new_v4(),
            name: params.name,
            display_name: params.display_name,
            product_name: params.product_name,
            category: summary_of(&category),
            price: params.price,
            description: params.description,
            material: params.material,
            color: params.color,
            created_at: OffsetDateTime::now_utc(),
        };
        self.templates.lock().await.insert(0, record.clone());
        Ok(record)
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), RepoError> {
        let mut templates = self.templates.lock().await;
        let before = templates.len();
        templates.retain(|template| template.id != id);
        if templates.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ----- In-memory cache backends -----

/// Healthy cache backend over hash maps.
#[derive(Default)]
pub struct MemoryCacheStore {
    pub entries: StdMutex<HashMap<String, String>>,
    pub sets: StdMutex<HashMap<String, Vec<String>>>,
}

impl MemoryCacheStore {
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn poison_entry(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        let mut sets = self.sets.lock().unwrap();
        for key in keys {
            sets.remove(key);
        }
        Ok(())
    }

    async fn track(&self, index: &str, key: &str) -> Result<(), CacheError> {
        let mut sets = self.sets.lock().unwrap();
        let members = sets.entry(index.to_string()).or_default();
        if !members.iter().any(|member| member == key) {
            members.push(key.to_string());
        }
        Ok(())
    }

    async fn tracked(&self, index: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or_default())
    }
}

/// Cache backend where every operation fails, for degradation tests.
#[derive(Default)]
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn track(&self, _index: &str, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn tracked(&self, _index: &str) -> Result<Vec<String>, CacheError> {
        Err(CacheError::backend("connection refused"))
    }
}

// ----- Recording media store -----

#[derive(Default)]
pub struct RecordingMediaStore {
    pub uploads: AtomicUsize,
    pub destroyed: StdMutex<Vec<String>>,
    pub fail_uploads: bool,
}

impl RecordingMediaStore {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Default::default()
        }
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, _image: ImagePayload) -> Result<StoredImage, MediaError> {
        if self.fail_uploads {
            return Err(MediaError::Rejected {
                status: 420,
                detail: "upload quota exceeded".to_string(),
            });
        }
        let index = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(StoredImage {
            url: format!("https://img.example/{index}"),
            asset_id: format!("asset-{index}"),
        })
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), MediaError> {
        self.destroyed.lock().unwrap().push(asset_id.to_string());
        Ok(())
    }
}

// ----- Router assembly -----

pub struct TestBackend {
    pub catalog: Arc<MemoryCatalog>,
    pub media: Arc<RecordingMediaStore>,
}

pub fn build_state(
    catalog: Arc<MemoryCatalog>,
    media: Arc<RecordingMediaStore>,
    cache: CatalogCache,
) -> ApiState {
    let categories_repo: Arc<dyn CategoriesRepo> = catalog.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = catalog.clone();
    let products_repo: Arc<dyn ProductsRepo> = catalog.clone();
    let products_write_repo: Arc<dyn ProductsWriteRepo> = catalog.clone();
    let templates_repo: Arc<dyn TemplatesRepo> = catalog.clone();
    let templates_write_repo: Arc<dyn TemplatesWriteRepo> = catalog;
    let media: Arc<dyn MediaStore> = media;

    ApiState {
        categories: Arc::new(CategoryService::new(
            categories_repo,
            categories_write_repo,
            cache.clone(),
        )),
        products: Arc::new(ProductService::new(
            products_repo,
            products_write_repo,
            media,
            cache,
        )),
        templates: Arc::new(TemplateService::new(templates_repo, templates_write_repo)),
        access: Arc::new(AdminAccess::new(ADMIN_KEY, ADMIN_USERNAME, ADMIN_PASSWORD)),
        upload_body_limit: 10 * 1024 * 1024,
    }
}

/// Full router over fresh in-memory stores with a healthy cache.
pub fn router() -> (Router, TestBackend) {
    let store = Arc::new(MemoryCacheStore::default());
    router_with_cache(CatalogCache::new(store, Duration::from_secs(300)))
}

pub fn router_with_cache(cache: CatalogCache) -> (Router, TestBackend) {
    let catalog = Arc::new(MemoryCatalog::default());
    let media = Arc::new(RecordingMediaStore::default());
    let router = http::build_router(build_state(catalog.clone(), media.clone(), cache));
    (router, TestBackend { catalog, media })
}

// ----- Request helpers -----

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn admin_json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::empty())
        .expect("request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

// ----- Multipart helpers -----

pub const MULTIPART_BOUNDARY: &str = "telaio-test-boundary";

/// Build a multipart body with the given text fields and `images` file parts.
pub fn multipart_body(fields: &[(&str, &str)], images: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (file_name, data) in images {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn admin_multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::from(body))
        .expect("request")
}
