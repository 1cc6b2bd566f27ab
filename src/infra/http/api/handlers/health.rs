use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::error::ErrorReport;
use crate::infra::http::api::models::HealthResponse;
use crate::infra::http::api::state::ApiState;

/// `200` while the store is connected, `503` otherwise. Cache state is
/// reported but never fails the check.
pub async fn health(State(state): State<ApiState>) -> Response {
    let database = state.health.database.state();
    let cache = state
        .health
        .cache
        .as_ref()
        .map(|monitor| monitor.state().as_str())
        .unwrap_or("disabled");

    let (status, label) = if database.is_connected() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: label.to_string(),
        database: database.as_str().to_string(),
        cache: cache.to_string(),
    };
    let mut response = (status, Json(body)).into_response();
    if !database.is_connected() {
        ErrorReport::from_message(
            "infra::http::health",
            status,
            format!("database is {}", database.as_str()),
        )
        .attach(&mut response);
    }
    response
}
