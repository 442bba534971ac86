use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{requests::FindAllProducts, response::ProductResponse},
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

const TRACER: &str = "product-query-service";

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_query_service");

        Self { query, metrics }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        info!(
            "🔍 Finding products | Search: {:?}, Active: {:?}",
            req.search, req.active
        );

        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_all_products",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
            ],
        );

        match self.query.find_all(req).await {
            Ok(products) => {
                info!("✅ Found {} products", products.len());
                tracing_ctx.success(&self.metrics, method, "Products retrieved");
                Ok(ApiResponse::success(
                    "Products retrieved successfully",
                    products.into_iter().map(ProductResponse::from).collect(),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "find_product_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        match self.query.find_by_id(id).await {
            Ok(Some(product)) => {
                tracing_ctx.success(&self.metrics, method, "Product retrieved");
                Ok(ApiResponse::success(
                    "Product retrieved successfully",
                    ProductResponse::from(product),
                ))
            }
            Ok(None) => {
                tracing_ctx.failure(&self.metrics, method, "Product not found");
                Err(ServiceError::NotFound("Product not found".into()))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(ServiceError::Repo(err))
            }
        }
    }
}
