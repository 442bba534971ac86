use super::hydrate_orders;
use crate::{
    abstract_trait::{
        order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
        user::repository::DynUserQueryRepository,
    },
    domain::{requests::FindAllOrders, response::OrderResponse},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;

const TRACER: &str = "order-query-service";

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    user_query: DynUserQueryRepository,
    metrics: Metrics,
}

pub struct OrderQueryServiceDeps {
    pub query: DynOrderQueryRepository,
    pub user_query: DynUserQueryRepository,
}

impl OrderQueryService {
    pub fn new(deps: OrderQueryServiceDeps, registry: &mut Registry) -> Self {
        let OrderQueryServiceDeps { query, user_query } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "order_query_service");

        Self {
            query,
            user_query,
            metrics,
        }
    }

    async fn load_all(&self, req: &FindAllOrders) -> Result<Vec<OrderResponse>, ServiceError> {
        let orders = self.query.find_all(req).await?;
        hydrate_orders(orders, &self.query, &self.user_query).await
    }

    async fn load_one(&self, id: i32) -> Result<OrderResponse, ServiceError> {
        let order = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))?;

        hydrate_orders(vec![order], &self.query, &self.user_query)
            .await?
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("🔍 Finding orders | Client: {:?}", req.client_id);

        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_all_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_all"),
            ],
        );

        match self.load_all(req).await {
            Ok(orders) => {
                info!("✅ Found {} orders", orders.len());
                tracing_ctx.success(&self.metrics, method, "Orders retrieved");
                Ok(ApiResponse::success("Orders retrieved successfully", orders))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        match self.load_one(id).await {
            Ok(order) => {
                tracing_ctx.success(&self.metrics, method, "Order retrieved");
                Ok(ApiResponse::success("Order retrieved successfully", order))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }
}
