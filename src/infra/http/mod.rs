//! HTTP surface: router assembly, middleware, and API handlers.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};

/// Assemble the full router: public reads plus the admin surface behind the
/// shared-key gate. Request-context and response-logging middleware wrap
/// everything.
pub fn build_router(state: ApiState) -> Router {
    let admin_state = state.clone();
    let body_limit = state.upload_body_limit;

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::list_categories))
        .route("/products", get(handlers::list_products))
        .route("/products/{id}", get(handlers::get_product))
        .route("/auth/login", post(handlers::login));

    let admin = Router::new()
        .route("/categories", post(handlers::create_category))
        .route("/categories/{id}", delete(handlers::delete_category))
        .route("/products", post(handlers::create_product))
        .route("/products/{id}", delete(handlers::delete_product))
        .route(
            "/product-templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/product-templates/{id}", delete(handlers::delete_template))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn_with_state(
            admin_state,
            middleware::require_admin,
        ));

    public
        .merge(admin)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
