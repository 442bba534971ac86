use crate::{
    domain::requests::FindAllOrders,
    model::{Order as OrderModel, OrderDetail as OrderDetailModel},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_all(&self, req: &FindAllOrders) -> Result<Vec<OrderModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError>;
    /// Newest first.
    async fn find_by_client(&self, client_id: i32) -> Result<Vec<OrderModel>, RepositoryError>;
    /// Lines of every given order, in insertion order.
    async fn find_details(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderDetailModel>, RepositoryError>;
}
