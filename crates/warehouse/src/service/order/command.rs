use super::{hydrate_orders, pricing};
use crate::{
    abstract_trait::{
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        product::repository::DynProductQueryRepository,
        user::repository::DynUserQueryRepository,
    },
    domain::{
        requests::{
            CancelOrderRecordRequest, CancelOrderRequest, CreateOrderRecordRequest,
            CreateOrderRequest, UpdateOrderNotesRequest,
        },
        response::{OrderCancellationResponse, OrderResponse, RestoredProduct},
    },
    model::{PaymentMethod, Product as ProductModel},
    service::validation_failure,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext},
};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use validator::Validate;

const TRACER: &str = "order-command-service";

const DEFAULT_CANCEL_REASON: &str = "No reason provided";

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    user_query: DynUserQueryRepository,
    product_query: DynProductQueryRepository,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub user_query: DynUserQueryRepository,
    pub product_query: DynProductQueryRepository,
}

fn order_not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("Order not found".into()),
        other => ServiceError::Repo(other),
    }
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            user_query,
            product_query,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "order_command_service");

        Self {
            command,
            query,
            user_query,
            product_query,
            metrics,
        }
    }

    async fn place_order(&self, req: &CreateOrderRequest) -> Result<OrderResponse, ServiceError> {
        req.validate().map_err(|e| validation_failure(&e))?;

        let mut seen = HashSet::new();
        let duplicates: Vec<i32> = req
            .products
            .iter()
            .map(|p| p.product_id)
            .filter(|id| !seen.insert(*id))
            .collect();
        if !duplicates.is_empty() {
            return Err(ServiceError::Validation(vec![format!(
                "products: each product may appear only once, repeated: {duplicates:?}"
            )]));
        }

        let client = self
            .user_query
            .find_by_id(req.client_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        let product_ids: Vec<i32> = req.products.iter().map(|p| p.product_id).collect();
        let products: HashMap<i32, ProductModel> = self
            .product_query
            .find_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.product_id, p))
            .collect();

        let unavailable: Vec<i32> = product_ids
            .iter()
            .copied()
            .filter(|id| !products.get(id).is_some_and(|p| p.is_active))
            .collect();
        if !unavailable.is_empty() {
            warn!("⚠️ Order rejected, unavailable products: {unavailable:?}");
            return Err(ServiceError::InactiveProducts(unavailable));
        }

        let discount = req.discount.unwrap_or(Decimal::ZERO);
        let quote = pricing::quote_order(&client, &req.products, &products, discount)?;

        if req.payment_method == PaymentMethod::AccountDebit && client.balance < quote.total {
            return Err(ServiceError::InsufficientBalance {
                available: client.balance,
                required: quote.total,
            });
        }

        info!(
            "🧾 Order for client {} priced at {} (subtotal {}, discount {})",
            client.user_id, quote.total, quote.subtotal, quote.discount
        );

        let record = CreateOrderRecordRequest {
            client_id: client.user_id,
            payment_method: req.payment_method,
            notes: req.notes.clone(),
            discount: quote.discount,
            total_amount: quote.total,
            lines: quote.lines,
        };

        let (order, details) = self.command.create_order(&record).await?;

        Ok(OrderResponse::from_parts(order, Some(client), details))
    }

    async fn rewrite_notes(
        &self,
        id: i32,
        req: &UpdateOrderNotesRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let order = self
            .command
            .update_notes(id, req.notes.as_deref())
            .await
            .map_err(order_not_found)?;

        hydrate_orders(vec![order], &self.query, &self.user_query)
            .await?
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))
    }

    async fn hard_delete(
        &self,
        id: i32,
        req: &CancelOrderRequest,
    ) -> Result<OrderCancellationResponse, ServiceError> {
        let order = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))?;

        let balance_credit = if req.restore_balance && order.payment_method.touches_balance() {
            order.total_amount
        } else {
            Decimal::ZERO
        };

        let record = CancelOrderRecordRequest {
            order_id: order.order_id,
            client_id: order.client_id,
            restore_stock: req.restore_stock,
            balance_credit,
        };

        let details = self
            .command
            .cancel_order(&record)
            .await
            .map_err(order_not_found)?;

        let restored_products = if req.restore_stock {
            details
                .into_iter()
                .map(|d| RestoredProduct {
                    product_id: d.product_id,
                    product_name: d.product_name,
                    quantity: d.quantity,
                })
                .collect()
        } else {
            Vec::new()
        };

        let reason = req
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_CANCEL_REASON)
            .to_string();

        Ok(OrderCancellationResponse {
            deleted_order_id: order.order_id,
            stock_restored: req.restore_stock,
            restored_products,
            balance_restored: balance_credit,
            reason,
        })
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "🏗️ Creating order for client_id={} with {} lines",
            req.client_id,
            req.products.len()
        );

        let method = Method::Post;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.client_id", req.client_id.to_string()),
                KeyValue::new("order.payment_method", req.payment_method.as_str()),
            ],
        );

        match self.place_order(req).await {
            Ok(order) => {
                tracing_ctx.success(&self.metrics, method, "Order created");
                Ok(ApiResponse::success("Order created successfully", order))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }

    async fn update_notes(
        &self,
        id: i32,
        req: &UpdateOrderNotesRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Updating notes of order ID={id}");

        let method = Method::Patch;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "update_order_notes",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update_notes"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        match self.rewrite_notes(id, req).await {
            Ok(order) => {
                tracing_ctx.success(&self.metrics, method, "Order notes updated");
                Ok(ApiResponse::success("Order updated successfully", order))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(err)
            }
        }
    }

    async fn cancel_order(
        &self,
        id: i32,
        req: &CancelOrderRequest,
    ) -> Result<ApiResponse<OrderCancellationResponse>, ServiceError> {
        info!(
            "🗑️ Cancelling order ID={id} | restore stock: {}, restore balance: {}",
            req.restore_stock, req.restore_balance
        );

        let method = Method::Delete;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "cancel_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "cancel"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        match self.hard_delete(id, req).await {
            Ok(cancellation) => {
                tracing_ctx.success(&self.metrics, method, "Order cancelled");
                Ok(ApiResponse::success(
                    "Order cancelled successfully",
                    cancellation,
                ))
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
        di::DependenciesInject,
        domain::requests::{
            CancelOrderRequest, CreateOrderRequest, CreateRefundRequest, OrderProductRequest,
            UpdateOrderNotesRequest,
        },
        model::{PaymentMethod, UserRole},
        test_utils::InMemoryStore,
    };
    use prometheus_client::registry::Registry;
    use rust_decimal::Decimal;
    use shared::errors::ServiceError;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn setup() -> (InMemoryStore, DependenciesInject) {
        let store = InMemoryStore::new();
        let di = DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        (store, di)
    }

    fn order_for(
        client_id: i32,
        payment_method: PaymentMethod,
        lines: &[(i32, i32)],
    ) -> CreateOrderRequest {
        CreateOrderRequest {
            client_id,
            payment_method,
            notes: None,
            discount: None,
            products: lines
                .iter()
                .map(|&(product_id, quantity)| OrderProductRequest {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn account_debit_order_takes_stock_and_balance() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(10000));
        let whey = store.add_product("Whey", 10, dec(3990), Some(dec(3490)));
        let bar = store.add_product("Protein bar", 50, dec(250), None);

        let mut req = order_for(
            member.user_id,
            PaymentMethod::AccountDebit,
            &[(whey.product_id, 2), (bar.product_id, 4)],
        );
        req.discount = Some(dec(500));

        let response = di.order_command.create_order(&req).await.unwrap();
        let order = response.data;

        // 2 x 39.90 + 4 x 2.50 - 5.00
        assert_eq!(order.total_amount, dec(8480));
        assert_eq!(order.discount, dec(500));
        assert!(!order.is_refund);
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].product.name, "Whey");
        assert_eq!(order.client.as_ref().map(|c| c.id), Some(member.user_id));

        assert_eq!(store.product(whey.product_id).quantity, 8);
        assert_eq!(store.product(bar.product_id).quantity, 46);
        assert_eq!(store.user(member.user_id).balance, dec(1520));
    }

    #[tokio::test]
    async fn trainers_pay_the_trainer_price() {
        let (store, di) = setup();
        let coach = store.add_user("coach@gym.test", UserRole::Trainer, Decimal::ZERO);
        let whey = store.add_product("Whey", 10, dec(3990), Some(dec(3490)));
        let towel = store.add_product("Towel", 10, dec(1200), None);

        let req = order_for(
            coach.user_id,
            PaymentMethod::Cash,
            &[(whey.product_id, 1), (towel.product_id, 1)],
        );
        let order = di.order_command.create_order(&req).await.unwrap().data;

        assert_eq!(order.products[0].unit_price, dec(3490));
        assert_eq!(order.products[1].unit_price, dec(1200));
        assert_eq!(order.total_amount, dec(4690));
        assert_eq!(store.user(coach.user_id).balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn insufficient_stock_writes_nothing() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);
        let whey = store.add_product("Whey", 1, dec(3990), None);

        let req = order_for(member.user_id, PaymentMethod::Cash, &[(whey.product_id, 2)]);
        let err = di.order_command.create_order(&req).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
        assert_eq!(store.product(whey.product_id).quantity, 1);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn insufficient_balance_writes_nothing() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(1000));
        let whey = store.add_product("Whey", 5, dec(3990), None);

        let req = order_for(
            member.user_id,
            PaymentMethod::AccountDebit,
            &[(whey.product_id, 1)],
        );
        let err = di.order_command.create_order(&req).await.unwrap_err();

        assert!(matches!(err, ServiceError::InsufficientBalance { .. }));
        assert_eq!(store.product(whey.product_id).quantity, 5);
        assert_eq!(store.user(member.user_id).balance, dec(1000));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn inactive_and_unknown_products_are_listed() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);
        let old = store.add_product("Old shaker", 5, dec(500), None);
        store.deactivate(old.product_id);

        let req = order_for(
            member.user_id,
            PaymentMethod::Cash,
            &[(old.product_id, 1), (999, 1)],
        );
        let err = di.order_command.create_order(&req).await.unwrap_err();

        match err {
            ServiceError::InactiveProducts(ids) => assert_eq!(ids, vec![old.product_id, 999]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_client_is_not_found() {
        let (store, di) = setup();
        let whey = store.add_product("Whey", 5, dec(3990), None);

        let req = order_for(42, PaymentMethod::Cash, &[(whey.product_id, 1)]);
        let err = di.order_command.create_order(&req).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn repeated_and_empty_lines_are_rejected() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);
        let whey = store.add_product("Whey", 5, dec(3990), None);

        let repeated = order_for(
            member.user_id,
            PaymentMethod::Cash,
            &[(whey.product_id, 1), (whey.product_id, 2)],
        );
        assert!(matches!(
            di.order_command.create_order(&repeated).await,
            Err(ServiceError::Validation(_))
        ));

        let empty = order_for(member.user_id, PaymentMethod::Cash, &[]);
        assert!(matches!(
            di.order_command.create_order(&empty).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn cancelling_restores_stock_and_balance() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(5000));
        let whey = store.add_product("Whey", 10, dec(1000), None);

        let req = order_for(
            member.user_id,
            PaymentMethod::AccountDebit,
            &[(whey.product_id, 3)],
        );
        let order = di.order_command.create_order(&req).await.unwrap().data;
        assert_eq!(store.user(member.user_id).balance, dec(2000));

        let cancelled = di
            .order_command
            .cancel_order(order.id, &CancelOrderRequest::default())
            .await
            .unwrap()
            .data;

        assert_eq!(cancelled.deleted_order_id, order.id);
        assert!(cancelled.stock_restored);
        assert_eq!(cancelled.restored_products.len(), 1);
        assert_eq!(cancelled.restored_products[0].quantity, 3);
        assert_eq!(cancelled.balance_restored, dec(3000));
        assert_eq!(cancelled.reason, "No reason provided");

        assert_eq!(store.product(whey.product_id).quantity, 10);
        assert_eq!(store.user(member.user_id).balance, dec(5000));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.detail_count(), 0);
    }

    #[tokio::test]
    async fn cancelling_without_restoring_keeps_stock_and_balance() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(5000));
        let whey = store.add_product("Whey", 10, dec(1000), None);

        let req = order_for(
            member.user_id,
            PaymentMethod::AccountDebit,
            &[(whey.product_id, 3)],
        );
        let order = di.order_command.create_order(&req).await.unwrap().data;

        let options = CancelOrderRequest {
            restore_stock: false,
            restore_balance: false,
            reason: Some("Broken on delivery".into()),
        };
        let cancelled = di
            .order_command
            .cancel_order(order.id, &options)
            .await
            .unwrap()
            .data;

        assert!(!cancelled.stock_restored);
        assert!(cancelled.restored_products.is_empty());
        assert_eq!(cancelled.balance_restored, Decimal::ZERO);
        assert_eq!(cancelled.reason, "Broken on delivery");
        assert_eq!(store.product(whey.product_id).quantity, 7);
        assert_eq!(store.user(member.user_id).balance, dec(2000));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn cash_orders_never_touch_the_balance_on_cancel() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(100));
        let whey = store.add_product("Whey", 10, dec(1000), None);

        let req = order_for(member.user_id, PaymentMethod::Cash, &[(whey.product_id, 1)]);
        let order = di.order_command.create_order(&req).await.unwrap().data;
        let cancelled = di
            .order_command
            .cancel_order(order.id, &CancelOrderRequest::default())
            .await
            .unwrap()
            .data;

        assert_eq!(cancelled.balance_restored, Decimal::ZERO);
        assert_eq!(store.user(member.user_id).balance, dec(100));
    }

    #[tokio::test]
    async fn cancelling_a_refund_takes_the_credit_back() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(1000));

        let refund = di
            .refund
            .create_refund(&CreateRefundRequest {
                client_id: member.user_id,
                amount: dec(1500),
                reason: None,
            })
            .await
            .unwrap()
            .data;
        assert_eq!(store.user(member.user_id).balance, dec(2500));

        let cancelled = di
            .order_command
            .cancel_order(refund.id, &CancelOrderRequest::default())
            .await
            .unwrap()
            .data;

        assert_eq!(cancelled.balance_restored, dec(-1500));
        assert_eq!(store.user(member.user_id).balance, dec(1000));
    }

    #[tokio::test]
    async fn unknown_order_cannot_be_cancelled() {
        let (_store, di) = setup();
        let err = di
            .order_command
            .cancel_order(7, &CancelOrderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn notes_are_the_only_mutable_field() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);
        let whey = store.add_product("Whey", 10, dec(1000), None);
        let req = order_for(member.user_id, PaymentMethod::Qrcode, &[(whey.product_id, 1)]);
        let order = di.order_command.create_order(&req).await.unwrap().data;

        let updated = di
            .order_command
            .update_notes(
                order.id,
                &UpdateOrderNotesRequest {
                    notes: Some("Paid at the desk".into()),
                },
            )
            .await
            .unwrap()
            .data;

        assert_eq!(updated.notes.as_deref(), Some("Paid at the desk"));
        assert_eq!(updated.total_amount, order.total_amount);
        assert_eq!(updated.products.len(), 1);

        let missing = di
            .order_command
            .update_notes(
                999,
                &UpdateOrderNotesRequest {
                    notes: None,
                },
            )
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn sub_cent_discount_is_rejected_before_any_write() {
        let (store, di) = setup();
        let member = store.add_user("member@gym.test", UserRole::User, dec(10000));
        let whey = store.add_product("Whey", 5, dec(1000), None);

        let mut req = order_for(
            member.user_id,
            PaymentMethod::AccountDebit,
            &[(whey.product_id, 1)],
        );
        req.discount = Some(Decimal::new(5, 3));

        let err = di.order_command.create_order(&req).await.unwrap_err();
        match err {
            ServiceError::Validation(messages) => assert_eq!(
                messages,
                vec!["discount: Amount cannot have more than 2 decimal places".to_string()]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.user(member.user_id).balance, dec(10000));
        assert_eq!(store.product(whey.product_id).quantity, 5);
        assert_eq!(store.order_count(), 0);
    }
}
