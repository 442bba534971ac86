use crate::{
    abstract_trait::refund::DynRefundService,
    domain::{requests::CreateRefundRequest, response::OrderResponse},
    middleware::validate::SimpleValidatedJson,
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use shared::{domain::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/refunds",
    tag = "Refund",
    request_body = CreateRefundRequest,
    responses(
        (status = 201, description = "Refund credited to the client balance", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn create_refund(
    Extension(service): Extension<DynRefundService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateRefundRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_refund(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub fn refund_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/refunds", post(create_refund))
        .layer(Extension(app_state.di_container.refund.clone()))
}
