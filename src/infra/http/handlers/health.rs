//! Liveness probe

use axum::http::StatusCode;

/// Report process liveness. Backend reachability is intentionally not
/// checked here so a degraded cache or database never flaps the probe.
pub async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
