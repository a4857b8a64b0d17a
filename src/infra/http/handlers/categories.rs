//! Category handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::catalog::categories::CreateCategoryCommand;

use super::{category_to_api, parse_id};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::CategoryCreateRequest;
use crate::infra::http::state::ApiState;

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list().await.map_err(category_to_api)?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<ApiState>,
    Json(payload): Json<CategoryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreateCategoryCommand {
        name: payload.name,
        image: payload.image,
    };

    let category = state
        .categories
        .create(command)
        .await
        .map_err(category_to_api)?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category")?;

    state.categories.delete(id).await.map_err(category_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
