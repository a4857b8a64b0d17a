use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateProductParams, ProductsRepo, ProductsWriteRepo, RepoError,
};
use crate::domain::entities::{CategorySummary, ProductImage, ProductRecord};

use super::PostgresCatalog;
use super::util::map_sqlx_error;

const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.price, p.description, p.material, p.color,
        p.images, p.main_image, p.created_at,
        c.id AS category_id, c.name AS category_name,
        c.slug AS category_slug, c.image AS category_image
    FROM products p
    INNER JOIN categories c ON c.id = p.category_id
"#;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: f64,
    description: String,
    material: String,
    color: String,
    images: Json<Vec<ProductImage>>,
    main_image: Option<String>,
    created_at: OffsetDateTime,
    category_id: Uuid,
    category_name: String,
    category_slug: String,
    category_image: Option<String>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
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
            images: row.images.0,
            main_image: row.main_image,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductsRepo for PostgresCatalog {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY p.created_at DESC, p.id DESC");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(RepoError::from_persistence)?;

        Ok(row.map(ProductRecord::from))
    }
}

#[async_trait]
impl ProductsWriteRepo for PostgresCatalog {
    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category_id, price, description, material, color,
                images, main_image
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(&params.name)
        .bind(params.category_id)
        .bind(params.price)
        .bind(&params.description)
        .bind(&params.material)
        .bind(&params.color)
        .bind(Json(&params.images))
        .bind(&params.main_image)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        self.find_product(id)
            .await?
            .ok_or_else(|| RepoError::from_persistence("inserted product row vanished"))
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
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
