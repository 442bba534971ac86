use crate::domain::requests::strictly_positive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefundRequest {
    #[validate(range(min = 1, message = "Invalid client id"))]
    #[schema(example = 1)]
    pub client_id: i32,

    #[validate(custom(function = "strictly_positive"))]
    #[schema(value_type = String, example = "15.00")]
    pub amount: Decimal,

    #[schema(example = "Damaged shaker returned")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateRefundRecordRequest {
    pub client_id: i32,
    pub amount: Decimal,
    pub notes: String,
}
