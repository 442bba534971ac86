use crate::domain::requests::non_negative;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FindAllProducts {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Whey protein 1kg")]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 20)]
    pub quantity: i32,

    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "39.90")]
    pub price: Decimal,

    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>, example = "34.90")]
    pub trainer_price: Option<Decimal>,

    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "22.00")]
    pub cost: Decimal,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "39.90")]
    pub price: Decimal,

    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>, example = "34.90")]
    pub trainer_price: Option<Decimal>,

    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "22.00")]
    pub cost: Decimal,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Relative stock movement, e.g. `+12` on delivery or `-1` for breakage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    #[schema(example = 12)]
    pub delta: i32,
}
