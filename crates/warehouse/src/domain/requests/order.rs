use crate::{domain::requests::non_negative, model::PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FindAllOrders {
    pub client_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductRequest {
    #[validate(range(min = 1, message = "Invalid product id"))]
    #[schema(example = 3)]
    pub product_id: i32,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "Invalid client id"))]
    #[schema(example = 1)]
    pub client_id: i32,

    pub payment_method: PaymentMethod,

    pub notes: Option<String>,

    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>, example = "5.00")]
    pub discount: Option<Decimal>,

    #[validate(length(min = 1, message = "At least one product is required"), nested)]
    pub products: Vec<OrderProductRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderNotesRequest {
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Options for a hard delete. Every field is optional in the body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    #[serde(default = "default_true")]
    pub restore_stock: bool,

    #[serde(default = "default_true")]
    pub restore_balance: bool,

    pub reason: Option<String>,
}

impl Default for CancelOrderRequest {
    fn default() -> Self {
        Self {
            restore_stock: true,
            restore_balance: true,
            reason: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrderDetailRecordRequest {
    pub product_id: i32,
    pub product_name: String,
    pub product_description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Fully priced order, ready to be written in one transaction.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub client_id: i32,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub lines: Vec<CreateOrderDetailRecordRequest>,
}

impl CreateOrderRecordRequest {
    /// Amount to take from the client balance, zero unless paid by account debit.
    pub fn balance_debit(&self) -> Decimal {
        if self.payment_method.touches_balance() {
            self.total_amount
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone)]
pub struct CancelOrderRecordRequest {
    pub order_id: i32,
    pub client_id: i32,
    pub restore_stock: bool,
    /// Added back to the client balance; negative for a refund.
    pub balance_credit: Decimal,
}
