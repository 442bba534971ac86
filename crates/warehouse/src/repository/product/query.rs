use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::FindAllProducts, model::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!(
            "🔍 Fetching products with search: {:?}, active: {:?}",
            req.search, req.active
        );

        let search = req
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT product_id, name, description, quantity, price, trainer_price, cost,
                   is_active, created_at, updated_at
            FROM products
            WHERE ($1::TEXT IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR description ILIKE '%' || $1 || '%')
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            ORDER BY product_id
            "#,
        )
        .bind(search)
        .bind(req.active)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT product_id, name, description, quantity, price, trainer_price, cost,
                   is_active, created_at, updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT product_id, name, description, quantity, price, trainer_price, cost,
                   is_active, created_at, updated_at
            FROM products
            WHERE product_id = ANY($1)
            ORDER BY product_id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products {:?}: {:?}", ids, e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }
}
