//! Product handlers

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::catalog::products::CreateProductCommand;
use crate::application::media::ImagePayload;

use super::{parse_id, product_to_api};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::ApiState;

pub async fn list_products(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.products.list().await.map_err(product_to_api)?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;

    let product = state.products.get(id).await.map_err(product_to_api)?;

    Ok(Json(product))
}

/// Create a product from a multipart form.
///
/// Text fields: `name`, `category_id`, `price`, `description`, `material`,
/// `color`, `main_image_index`. Every `images` part is taken as one image
/// file; an out-of-range or unparsable `main_image_index` falls back to the
/// first image.
pub async fn create_product(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut name = None;
    let mut category_id = None;
    let mut price = None;
    let mut description = String::new();
    let mut material = String::new();
    let mut color = String::new();
    let mut main_image_index = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("invalid multipart payload", Some(err.to_string())))?
    {
        match field.name() {
            Some("name") => name = Some(read_text(field).await?),
            Some("category_id") => category_id = Some(read_text(field).await?),
            Some("price") => price = Some(read_text(field).await?),
            Some("description") => description = read_text(field).await?,
            Some("material") => material = read_text(field).await?,
            Some("color") => color = read_text(field).await?,
            Some("main_image_index") => main_image_index = Some(read_text(field).await?),
            Some("images") => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|err| {
                    ApiError::bad_request("failed to read image", Some(err.to_string()))
                })?;
                images.push(ImagePayload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| missing_field("name"))?;
    let raw_category = category_id.ok_or_else(|| missing_field("category_id"))?;
    let category_id = parse_id(&raw_category, "category")?;
    let raw_price = price.ok_or_else(|| missing_field("price"))?;
    let price: f64 = raw_price.trim().parse().map_err(|_| {
        ApiError::bad_request(
            "invalid price",
            Some(format!("`{raw_price}` is not a number")),
        )
    })?;
    let main_image_index =
        main_image_index.and_then(|raw| raw.trim().parse::<usize>().ok());

    let command = CreateProductCommand {
        name,
        category_id,
        price,
        description,
        material,
        color,
        main_image_index,
        images,
    };

    let product = state
        .products
        .create(command)
        .await
        .map_err(product_to_api)?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn delete_product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;

    state.products.delete(id).await.map_err(product_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::bad_request("invalid multipart payload", Some(err.to_string())))
}

fn missing_field(field: &'static str) -> ApiError {
    ApiError::bad_request("missing required field", Some(field.to_string()))
}
