use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateTemplateParams, RepoError, TemplatesRepo, TemplatesWriteRepo,
};
use crate::domain::entities::{CategorySummary, TemplateRecord};

use super::PostgresCatalog;
use super::util::map_sqlx_error;

const TEMPLATE_SELECT: &str = r#"
    SELECT
        t.id, t.name, t.display_name, t.product_name, t.price,
        t.description, t.material, t.color, t.created_at,
        c.id AS category_id, c.name AS category_name,
        c.slug AS category_slug, c.image AS category_image
    FROM product_templates t
    INNER JOIN categories c ON c.id = t.category_id
"#;

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    display_name: String,
    product_name: String,
    price: f64,
    description: String,
    material: String,
    color: String,
    created_at: OffsetDateTime,
    category_id: Uuid,
    category_name: String,
    category_slug: String,
    category_image: Option<String>,
}

impl From<TemplateRow> for TemplateRecord {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            product_name: row.product_name,
            category: CategorySummary {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
                image: row.category_image,
            },
            price: row.price,
            description: row.description,
            material: row.material,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TemplatesRepo for PostgresCatalog {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, RepoError> {
        let sql = format!("{TEMPLATE_SELECT} ORDER BY t.created_at DESC, t.id DESC");
        let rows = sqlx::query_as::<_, TemplateRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(TemplateRecord::from).collect())
    }
}

#[async_trait]
impl TemplatesWriteRepo for PostgresCatalog {
    async fn create_template(
        &self,
        params: CreateTemplateParams,
    ) -> Result<TemplateRecord, RepoError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO product_templates (
                id, name, display_name, product_name, category_id,
                price, description, material, color
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(&params.name)
        .bind(&params.display_name)
        .bind(&params.product_name)
        .bind(params.category_id)
        .bind(params.price)
        .bind(&params.description)
        .bind(&params.material)
        .bind(&params.color)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let sql = format!("{TEMPLATE_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM product_templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
