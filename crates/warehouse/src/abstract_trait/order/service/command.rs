use crate::domain::{
    requests::{CancelOrderRequest, CreateOrderRequest, UpdateOrderNotesRequest},
    response::{OrderCancellationResponse, OrderResponse},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_notes(
        &self,
        id: i32,
        req: &UpdateOrderNotesRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn cancel_order(
        &self,
        id: i32,
        req: &CancelOrderRequest,
    ) -> Result<ApiResponse<OrderCancellationResponse>, ServiceError>;
}
