use std::sync::Arc;

use crate::application::access::AdminAccess;
use crate::application::catalog::categories::CategoryService;
use crate::application::catalog::products::ProductService;
use crate::application::catalog::templates::TemplateService;

/// Shared state for the API router.
#[derive(Clone)]
pub struct ApiState {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub templates: Arc<TemplateService>,
    pub access: Arc<AdminAccess>,
    /// Upper bound on multipart upload bodies, in bytes.
    pub upload_body_limit: usize,
}
