use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::ProductCommandServiceTrait,
    },
    domain::{
        requests::{AdjustStockRequest, CreateProductRequest, UpdateProductRequest},
        response::ProductResponse,
    },
    service::validation_failure,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;
use validator::Validate;

const TRACER: &str = "product-command-service";

#[derive(Clone)]
pub struct ProductCommandService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_command_service");

        Self {
            query,
            command,
            metrics,
        }
    }

    async fn apply_stock_delta(
        &self,
        id: i32,
        delta: i32,
    ) -> Result<ProductResponse, ServiceError> {
        let product = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".into()))?;

        let Some(target) = product.quantity.checked_add(delta) else {
            return Err(ServiceError::Validation(vec![format!(
                "Stock of '{}' cannot exceed {}. Available: {}, Change: {}",
                product.name,
                i32::MAX,
                product.quantity,
                delta
            )]));
        };
        if target < 0 {
            return Err(ServiceError::Validation(vec![format!(
                "Stock of '{}' cannot go below zero. Available: {}, Change: {}",
                product.name, product.quantity, delta
            )]));
        }

        let updated = self
            .command
            .adjust_stock(id, delta)
            .await
            .map_err(product_not_found)?;

        Ok(ProductResponse::from(updated))
    }
}

fn product_not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("Product not found".into()),
        other => ServiceError::Repo(other),
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating product: {}", req.name);

        let method = Method::Post;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "create_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "create"),
                KeyValue::new("product.name", req.name.clone()),
            ],
        );

        if let Err(errors) = req.validate() {
            tracing_ctx.failure(&self.metrics, method, "Invalid product payload");
            return Err(validation_failure(&errors));
        }

        match self.command.create_product(req).await {
            Ok(product) => {
                tracing_ctx.success(&self.metrics, method, "Product created");
                Ok(ApiResponse::success(
                    "Product created successfully",
                    ProductResponse::from(product),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("✏️ Updating product ID={id}");

        let method = Method::Put;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "update_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "update"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        if let Err(errors) = req.validate() {
            tracing_ctx.failure(&self.metrics, method, "Invalid product payload");
            return Err(validation_failure(&errors));
        }

        match self.command.update_product(id, req).await {
            Ok(product) => {
                tracing_ctx.success(&self.metrics, method, "Product updated");
                Ok(ApiResponse::success(
                    "Product updated successfully",
                    ProductResponse::from(product),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(product_not_found(err))
            }
        }
    }

    async fn adjust_stock(
        &self,
        id: i32,
        req: &AdjustStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("📦 Adjusting stock of product ID={id} by {}", req.delta);

        let method = Method::Patch;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "adjust_stock",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "adjust_stock"),
                KeyValue::new("product.id", id.to_string()),
                KeyValue::new("stock.delta", req.delta.to_string()),
            ],
        );

        match self.apply_stock_delta(id, req.delta).await {
            Ok(product) => {
                tracing_ctx.success(&self.metrics, method, "Stock adjusted");
                Ok(ApiResponse::success("Stock updated successfully", product))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting product ID={id}");

        let method = Method::Delete;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "delete_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        match self.command.delete_product(id).await {
            Ok(()) => {
                tracing_ctx.success(&self.metrics, method, "Product deleted");
                Ok(ApiResponse::success("Product deleted successfully", ()))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(product_not_found(err))
            }
        }
    }
}
