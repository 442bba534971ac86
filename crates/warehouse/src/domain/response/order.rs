use crate::model::{
    Order as OrderModel, OrderDetail as OrderDetailModel, PaymentMethod, User as UserModel,
    UserRole,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
}

impl From<UserModel> for ClientSummary {
    fn from(value: UserModel) -> Self {
        ClientSummary {
            id: value.user_id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            role: value.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub product: ProductSummary,
}

impl From<OrderDetailModel> for OrderLineResponse {
    fn from(value: OrderDetailModel) -> Self {
        OrderLineResponse {
            id: value.order_detail_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            total_price: value.total_price,
            product: ProductSummary {
                id: value.product_id,
                name: value.product_name,
                description: value.product_description,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub client_id: i32,
    pub client: Option<ClientSummary>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub is_refund: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub products: Vec<OrderLineResponse>,
}

impl OrderResponse {
    pub fn from_parts(
        order: OrderModel,
        client: Option<UserModel>,
        details: Vec<OrderDetailModel>,
    ) -> Self {
        OrderResponse {
            id: order.order_id,
            client_id: order.client_id,
            client: client.map(ClientSummary::from),
            is_refund: order.is_refund(),
            total_amount: order.total_amount,
            discount: order.discount,
            payment_method: order.payment_method,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
            products: details.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

/// Order header without lines, as listed under a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub id: i32,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub is_refund: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl From<OrderModel> for OrderSummaryResponse {
    fn from(value: OrderModel) -> Self {
        OrderSummaryResponse {
            id: value.order_id,
            is_refund: value.is_refund(),
            total_amount: value.total_amount,
            discount: value.discount,
            payment_method: value.payment_method,
            notes: value.notes,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoredProduct {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancellationResponse {
    pub deleted_order_id: i32,
    pub stock_restored: bool,
    pub restored_products: Vec<RestoredProduct>,
    /// Amount put back on the client balance; negative when a refund is undone.
    #[schema(value_type = String)]
    pub balance_restored: Decimal,
    pub reason: String,
}
