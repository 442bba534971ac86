use crate::{
    abstract_trait::{
        order::repository::DynOrderCommandRepository,
        refund::RefundServiceTrait,
        user::repository::DynUserQueryRepository,
    },
    domain::{
        requests::{CreateRefundRecordRequest, CreateRefundRequest},
        response::OrderResponse,
    },
    service::validation_failure,
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
use validator::Validate;

const TRACER: &str = "refund-service";

#[derive(Clone)]
pub struct RefundService {
    command: DynOrderCommandRepository,
    user_query: DynUserQueryRepository,
    metrics: Metrics,
}

pub struct RefundServiceDeps {
    pub command: DynOrderCommandRepository,
    pub user_query: DynUserQueryRepository,
}

impl RefundService {
    pub fn new(deps: RefundServiceDeps, registry: &mut Registry) -> Self {
        let RefundServiceDeps {
            command,
            user_query,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "refund_service");

        Self {
            command,
            user_query,
            metrics,
        }
    }

    async fn credit(&self, req: &CreateRefundRequest) -> Result<OrderResponse, ServiceError> {
        req.validate().map_err(|e| validation_failure(&e))?;

        let client = self
            .user_query
            .find_by_id(req.client_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        let notes = req
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("Refund")
            .to_string();

        let record = CreateRefundRecordRequest {
            client_id: client.user_id,
            amount: req.amount,
            notes,
        };

        let order = self.command.create_refund(&record).await?;

        Ok(OrderResponse::from_parts(order, Some(client), Vec::new()))
    }
}

#[async_trait]
impl RefundServiceTrait for RefundService {
    async fn create_refund(
        &self,
        req: &CreateRefundRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "💸 Refunding {} to client_id={}",
            req.amount, req.client_id
        );

        let method = Method::Post;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "create_refund",
            vec![
                KeyValue::new("component", "refund"),
                KeyValue::new("operation", "create"),
                KeyValue::new("refund.client_id", req.client_id.to_string()),
            ],
        );

        match self.credit(req).await {
            Ok(order) => {
                tracing_ctx.success(&self.metrics, method, "Refund created");
                Ok(ApiResponse::success("Refund processed successfully", order))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        di::DependenciesInject, domain::requests::CreateRefundRequest, model::PaymentMethod,
        model::UserRole, test_utils::InMemoryStore,
    };
    use prometheus_client::registry::Registry;
    use rust_decimal::Decimal;
    use shared::errors::ServiceError;

    #[tokio::test]
    async fn refund_credits_balance_with_a_negative_order() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::new(500, 2));

        let order = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: member.user_id,
                amount: Decimal::new(1250, 2),
                reason: Some("Damaged shaker".into()),
            })
            .await
            .unwrap()
            .data;

        assert!(order.is_refund);
        assert_eq!(order.total_amount, Decimal::new(-1250, 2));
        assert_eq!(order.discount, Decimal::ZERO);
        assert_eq!(order.payment_method, PaymentMethod::AccountDebit);
        assert_eq!(order.notes.as_deref(), Some("Damaged shaker"));
        assert!(order.products.is_empty());
        assert_eq!(store.user(member.user_id).balance, Decimal::new(1750, 2));
    }

    #[tokio::test]
    async fn refund_notes_default_to_refund() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);

        let order = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: member.user_id,
                amount: Decimal::ONE,
                reason: Some("   ".into()),
            })
            .await
            .unwrap()
            .data;

        assert_eq!(order.notes.as_deref(), Some("Refund"));
    }

    #[tokio::test]
    async fn refund_rejects_unknown_client_and_non_positive_amounts() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);

        let unknown = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: 999,
                amount: Decimal::ONE,
                reason: None,
            })
            .await;
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));

        let negative = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: member.user_id,
                amount: Decimal::new(-100, 2),
                reason: None,
            })
            .await;
        assert!(matches!(negative, Err(ServiceError::Validation(_))));

        let sub_cent = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: member.user_id,
                amount: Decimal::new(1, 3),
                reason: None,
            })
            .await;
        assert!(matches!(sub_cent, Err(ServiceError::Validation(_))));
        assert_eq!(store.user(member.user_id).balance, Decimal::ZERO);
        assert_eq!(store.order_count(), 0);
    }
}
