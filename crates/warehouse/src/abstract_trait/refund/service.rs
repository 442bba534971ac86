use crate::domain::{requests::CreateRefundRequest, response::OrderResponse};
use anyhow::Result;
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

pub type DynRefundService = Arc<dyn RefundServiceTrait + Send + Sync>;

#[async_trait]
pub trait RefundServiceTrait {
    async fn create_refund(
        &self,
        req: &CreateRefundRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
