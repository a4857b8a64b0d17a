//! Product template handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::catalog::templates::CreateTemplateCommand;

use super::{parse_id, template_to_api};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::TemplateCreateRequest;
use crate::infra::http::state::ApiState;

pub async fn list_templates(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let templates = state.templates.list().await.map_err(template_to_api)?;
    Ok(Json(templates))
}

pub async fn create_template(
    State(state): State<ApiState>,
    Json(payload): Json<TemplateCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreateTemplateCommand {
        name: payload.name,
        display_name: payload.display_name,
        category_id: payload.category_id,
        price: payload.price,
        description: payload.description,
        material: payload.material,
        color: payload.color,
    };

    let template = state
        .templates
        .create(command)
        .await
        .map_err(template_to_api)?;

    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn delete_template(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "template")?;

    state.templates.delete(id).await.map_err(template_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
