use crate::{
    domain::requests::{
        CancelOrderRecordRequest, CreateOrderRecordRequest, CreateRefundRecordRequest,
    },
    model::{Order as OrderModel, OrderDetail as OrderDetailModel},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

/// Every method runs in a single transaction.
#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Inserts the order and its lines, takes the stock and, for account
    /// debits, the balance. A concurrent shortfall yields `Conflict`.
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(OrderModel, Vec<OrderDetailModel>), RepositoryError>;
    async fn update_notes(
        &self,
        id: i32,
        notes: Option<&str>,
    ) -> Result<OrderModel, RepositoryError>;
    /// Deletes the order and returns the lines it had.
    async fn cancel_order(
        &self,
        req: &CancelOrderRecordRequest,
    ) -> Result<Vec<OrderDetailModel>, RepositoryError>;
    async fn create_refund(
        &self,
        req: &CreateRefundRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;
}
