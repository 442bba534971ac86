use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::FindAllOrders,
    model::{Order as OrderModel, OrderDetail as OrderDetailModel},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(&self, req: &FindAllOrders) -> Result<Vec<OrderModel>, RepositoryError> {
        info!("🔍 Fetching orders for client: {:?}", req.client_id);

        let orders = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, client_id, total_amount, discount, payment_method, notes,
                   created_at, updated_at
            FROM orders
            WHERE ($1::INTEGER IS NULL OR client_id = $1)
            ORDER BY order_id
            "#,
        )
        .bind(req.client_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(orders)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, client_id, total_amount, discount, payment_method, notes,
                   created_at, updated_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(order)
    }

    async fn find_by_client(&self, client_id: i32) -> Result<Vec<OrderModel>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, client_id, total_amount, discount, payment_method, notes,
                   created_at, updated_at
            FROM orders
            WHERE client_id = $1
            ORDER BY created_at DESC, order_id DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders of client {}: {:?}", client_id, e);
            RepositoryError::from(e)
        })?;

        Ok(orders)
    }

    async fn find_details(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderDetailModel>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let details = sqlx::query_as::<_, OrderDetailModel>(
            r#"
            SELECT d.order_detail_id, d.order_id, d.product_id, d.quantity,
                   d.unit_price, d.total_price,
                   p.name AS product_name, p.description AS product_description
            FROM order_details d
            JOIN products p ON p.product_id = d.product_id
            WHERE d.order_id = ANY($1)
            ORDER BY d.order_detail_id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch lines of orders {:?}: {:?}", order_ids, e);
            RepositoryError::from(e)
        })?;

        Ok(details)
    }
}
