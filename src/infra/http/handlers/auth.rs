//! Admin login handler

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::infra::http::error::ApiError;
use crate::infra::http::models::{LoginRequest, LoginResponse};
use crate::infra::http::state::ApiState;

/// Check a username/password pair against the configured admin credentials.
///
/// This does not mint a session; clients that log in successfully still
/// present the admin key on every mutating request.
pub async fn login(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.access.verify_login(&payload.username, &payload.password) {
        return Err(ApiError::invalid_credentials());
    }

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
    }))
}
