use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{
    CreateTemplateParams, RepoError, TemplatesRepo, TemplatesWriteRepo,
};
use crate::domain::entities::TemplateRecord;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("template not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateTemplateCommand {
    pub name: String,
    pub display_name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub description: String,
    pub material: String,
    pub color: String,
}

/// Admin presets. Templates are low-volume admin data and are never shown to
/// customers, so reads go straight to the store with no cache in front.
#[derive(Clone)]
pub struct TemplateService {
    reader: Arc<dyn TemplatesRepo>,
    writer: Arc<dyn TemplatesWriteRepo>,
}

impl TemplateService {
    pub fn new(reader: Arc<dyn TemplatesRepo>, writer: Arc<dyn TemplatesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<TemplateRecord>, TemplateError> {
        self.reader
            .list_templates()
            .await
            .map_err(TemplateError::from)
    }

    pub async fn create(
        &self,
        command: CreateTemplateCommand,
    ) -> Result<TemplateRecord, TemplateError> {
        let CreateTemplateCommand {
            name,
            display_name,
            category_id,
            price,
            description,
            material,
            color,
        } = command;

        let name = name.trim().to_string();
        ensure_non_empty(&name, "name")?;
        let display_name = display_name.trim().to_string();
        ensure_non_empty(&display_name, "display_name")?;
        if !price.is_finite() || price < 0.0 {
            return Err(TemplateError::ConstraintViolation("price"));
        }

        // product_name mirrors display_name; older clients read the mirror.
        let product_name = display_name.clone();

        self.writer
            .create_template(CreateTemplateParams {
                name,
                display_name,
                product_name,
                category_id,
                price,
                description,
                material,
                color,
            })
            .await
            .map_err(TemplateError::from)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), TemplateError> {
        match self.writer.delete_template(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(TemplateError::NotFound),
            Err(err) => Err(TemplateError::Repo(err)),
        }
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), TemplateError> {
    if value.trim().is_empty() {
        return Err(TemplateError::ConstraintViolation(field));
    }
    Ok(())
}
