use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::{CancelOrderRequest, CreateOrderRequest, FindAllOrders, UpdateOrderNotesRequest},
        response::{OrderCancellationResponse, OrderResponse},
    },
    middleware::validate::SimpleValidatedJson,
    state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use shared::{domain::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    params(FindAllOrders),
    responses(
        (status = 200, description = "List of orders", body = ApiResponse<Vec<OrderResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation, stock, balance or inactive product error"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Stock or balance changed concurrently")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderNotesRequest,
    responses(
        (status = 200, description = "Order notes updated", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_notes(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderNotesRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_notes(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled, stock and balance restored", body = ApiResponse<OrderCancellationResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn cancel_order(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service
        .cancel_order(id, &CancelOrderRequest::default())
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

/// The body is optional, so it is read as raw bytes instead of `Json`.
#[utoipa::path(
    delete,
    path = "/api/orders/{id}/hard",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    request_body(content = CancelOrderRequest, description = "Optional cancellation options"),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<OrderCancellationResponse>),
        (status = 400, description = "Malformed options"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn hard_delete_order(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let options = parse_cancel_options(&body)?;
    let response = service.cancel_order(id, &options).await?;
    Ok((StatusCode::OK, Json(response)))
}

fn parse_cancel_options(body: &[u8]) -> Result<CancelOrderRequest, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CancelOrderRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("Invalid cancellation options: {e}")))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", get(get_orders).post(create_order))
        .route(
            "/api/orders/{id}",
            get(get_order)
                .patch(update_order_notes)
                .delete(cancel_order),
        )
        .route("/api/orders/{id}/hard", delete(hard_delete_order))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.di_container.order_command.clone()))
}
