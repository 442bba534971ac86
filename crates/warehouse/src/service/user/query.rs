use crate::{
    abstract_trait::{
        order::repository::DynOrderQueryRepository,
        user::{repository::DynUserQueryRepository, service::UserQueryServiceTrait},
    },
    domain::{
        requests::FindAllUsers,
        response::{OrderSummaryResponse, UserResponse, UserWithOrdersResponse},
    },
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

const TRACER: &str = "user-query-service";

#[derive(Clone)]
pub struct UserQueryService {
    query: DynUserQueryRepository,
    orders: DynOrderQueryRepository,
    metrics: Metrics,
}

pub struct UserQueryServiceDeps {
    pub query: DynUserQueryRepository,
    pub orders: DynOrderQueryRepository,
}

impl UserQueryService {
    pub fn new(deps: UserQueryServiceDeps, registry: &mut Registry) -> Self {
        let UserQueryServiceDeps { query, orders } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "user_query_service");

        Self {
            query,
            orders,
            metrics,
        }
    }

    async fn load_with_orders(&self, id: i32) -> Result<UserWithOrdersResponse, ServiceError> {
        let user = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        let orders = self.orders.find_by_client(id).await?;

        Ok(UserWithOrdersResponse {
            user: UserResponse::from(user),
            orders: orders.into_iter().map(OrderSummaryResponse::from).collect(),
        })
    }
}

#[async_trait]
impl UserQueryServiceTrait for UserQueryService {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<ApiResponse<Vec<UserResponse>>, ServiceError> {
        info!(
            "🔍 Finding users | Search: {:?}, Role: {:?}",
            req.search, req.role
        );

        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_all_users",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
            ],
        );

        match self.query.find_all(req).await {
            Ok(users) => {
                info!("✅ Found {} users", users.len());
                tracing_ctx.success(&self.metrics, method, "Users retrieved");
                Ok(ApiResponse::success(
                    "Users retrieved successfully",
                    users.into_iter().map(UserResponse::from).collect(),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<ApiResponse<UserWithOrdersResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_user_by_id",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        match self.load_with_orders(id).await {
            Ok(user) => {
                tracing_ctx.success(&self.metrics, method, "User retrieved");
                Ok(ApiResponse::success("User retrieved successfully", user))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }
}
