use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::{CreateProductRequest, UpdateProductRequest},
    model::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, description, quantity, price, trainer_price, cost, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING product_id, name, description, quantity, price, trainer_price, cost,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.quantity)
        .bind(req.price)
        .bind(req.trainer_price)
        .bind(req.cost)
        .bind(req.is_active)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to create product '{}': {:?}", req.name, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Created product ID {} ({})", product.product_id, product.name);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                quantity = $4,
                price = $5,
                trainer_price = $6,
                cost = $7,
                is_active = $8,
                updated_at = CURRENT_TIMESTAMP
            WHERE product_id = $1
            RETURNING product_id, name, description, quantity, price, trainer_price, cost,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.quantity)
        .bind(req.price)
        .bind(req.trainer_price)
        .bind(req.cost)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update product {}: {:?}", id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product ID {}", product.product_id);
        Ok(product)
    }

    async fn adjust_stock(&self, id: i32, delta: i32) -> Result<ProductModel, RepositoryError> {
        info!("📦 Adjusting stock of product {} by {}", id, delta);

        let updated = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET quantity = quantity + $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE product_id = $1 AND quantity + $2 >= 0
            RETURNING product_id, name, description, quantity, price, trainer_price, cost,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to adjust stock of product {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        if let Some(product) = updated {
            return Ok(product);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE product_id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await
                .map_err(RepositoryError::from)?;

        if exists {
            Err(RepositoryError::Conflict(format!(
                "Stock of product {id} cannot go below zero"
            )))
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted product ID {}", id);
        Ok(())
    }
}
