use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::{
        CancelOrderRecordRequest, CreateOrderRecordRequest, CreateRefundRecordRequest,
    },
    model::{Order as OrderModel, OrderDetail as OrderDetailModel, PaymentMethod},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, Transaction};
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn credit_balance(
        tx: &mut Transaction<'static, Postgres>,
        client_id: i32,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance + $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $1
            "#,
        )
        .bind(client_id)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to credit balance of user {}: {:?}", client_id, e);
            RepositoryError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(OrderModel, Vec<OrderDetailModel>), RepositoryError> {
        let mut tx = self.begin().await?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (client_id, total_amount, discount, payment_method, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING order_id, client_id, total_amount, discount, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(req.client_id)
        .bind(req.total_amount)
        .bind(req.discount)
        .bind(req.payment_method.as_str())
        .bind(&req.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to insert order for client {}: {:?}",
                req.client_id, e
            );
            RepositoryError::from(e)
        })?;

        // Row locks are taken in product id order so concurrent orders over
        // the same products cannot deadlock.
        let mut by_product: Vec<_> = req.lines.iter().collect();
        by_product.sort_by_key(|line| line.product_id);

        for line in by_product {
            let taken = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - $2,
                    updated_at = CURRENT_TIMESTAMP
                WHERE product_id = $1 AND quantity >= $2
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            if taken.rows_affected() == 0 {
                warn!(
                    "⚠️ Stock of product {} changed while ordering, rolling back",
                    line.product_id
                );
                return Err(RepositoryError::Conflict(format!(
                    "Stock of product {} changed during the order",
                    line.product_id
                )));
            }
        }

        let mut details = Vec::with_capacity(req.lines.len());

        for line in &req.lines {
            let order_detail_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO order_details (order_id, product_id, quantity, unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING order_detail_id
                "#,
            )
            .bind(order.order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.total_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to insert line for product {}: {:?}",
                    line.product_id, e
                );
                RepositoryError::from(e)
            })?;

            details.push(OrderDetailModel {
                order_detail_id,
                order_id: order.order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                product_name: line.product_name.clone(),
                product_description: line.product_description.clone(),
            });
        }

        let debit = req.balance_debit();
        if debit > Decimal::ZERO {
            let debited = sqlx::query(
                r#"
                UPDATE users
                SET balance = balance - $2,
                    updated_at = CURRENT_TIMESTAMP
                WHERE user_id = $1 AND balance >= $2
                "#,
            )
            .bind(req.client_id)
            .bind(debit)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            if debited.rows_affected() == 0 {
                warn!(
                    "⚠️ Balance of user {} changed while ordering, rolling back",
                    req.client_id
                );
                return Err(RepositoryError::Conflict(format!(
                    "Balance of user {} changed during the order",
                    req.client_id
                )));
            }
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created order ID {} for client {} with {} lines",
            order.order_id,
            order.client_id,
            details.len()
        );
        Ok((order, details))
    }

    async fn update_notes(
        &self,
        id: i32,
        notes: Option<&str>,
    ) -> Result<OrderModel, RepositoryError> {
        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET notes = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1
            RETURNING order_id, client_id, total_amount, discount, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update notes of order {}: {:?}", id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated notes of order ID {}", order.order_id);
        Ok(order)
    }

    async fn cancel_order(
        &self,
        req: &CancelOrderRecordRequest,
    ) -> Result<Vec<OrderDetailModel>, RepositoryError> {
        info!("🗑️ Cancelling order: {}", req.order_id);

        let mut tx = self.begin().await?;

        let locked: Option<i32> =
            sqlx::query_scalar("SELECT order_id FROM orders WHERE order_id = $1 FOR UPDATE")
                .bind(req.order_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;

        if locked.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let details = sqlx::query_as::<_, OrderDetailModel>(
            r#"
            SELECT d.order_detail_id, d.order_id, d.product_id, d.quantity,
                   d.unit_price, d.total_price,
                   p.name AS product_name, p.description AS product_description
            FROM order_details d
            JOIN products p ON p.product_id = d.product_id
            WHERE d.order_id = $1
            ORDER BY d.order_detail_id
            "#,
        )
        .bind(req.order_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if req.restore_stock {
            let mut by_product: Vec<_> = details.iter().collect();
            by_product.sort_by_key(|line| line.product_id);

            for line in by_product {
                sqlx::query(
                    r#"
                    UPDATE products
                    SET quantity = quantity + $2,
                        updated_at = CURRENT_TIMESTAMP
                    WHERE product_id = $1
                    "#,
                )
                .bind(line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!(
                        "❌ Failed to restock product {}: {:?}",
                        line.product_id, e
                    );
                    RepositoryError::from(e)
                })?;
            }
        }

        if !req.balance_credit.is_zero() {
            Self::credit_balance(&mut tx, req.client_id, req.balance_credit).await?;
        }

        sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(req.order_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(req.order_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Cancelled order ID {} (stock restored: {}, balance credit: {})",
            req.order_id, req.restore_stock, req.balance_credit
        );
        Ok(details)
    }

    async fn create_refund(
        &self,
        req: &CreateRefundRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut tx = self.begin().await?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (client_id, total_amount, discount, payment_method, notes)
            VALUES ($1, $2, 0, $3, $4)
            RETURNING order_id, client_id, total_amount, discount, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(req.client_id)
        .bind(-req.amount)
        .bind(PaymentMethod::AccountDebit.as_str())
        .bind(&req.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to insert refund for client {}: {:?}",
                req.client_id, e
            );
            RepositoryError::from(e)
        })?;

        Self::credit_balance(&mut tx, req.client_id, req.amount).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Refunded {} to client {} as order ID {}",
            req.amount, req.client_id, order.order_id
        );
        Ok(order)
    }
}
