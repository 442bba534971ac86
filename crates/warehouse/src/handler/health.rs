use crate::{domain::response::HealthResponse, state::AppState};
use axum::{Json, extract::State, response::IntoResponse, routing::get};
use chrono::Utc;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.environment.clone(),
    })
}

pub fn health_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/health", get(health_check))
        .with_state(app_state)
}
