use crate::{domain::requests::money, model::UserRole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FindAllUsers {
    /// Case-insensitive match on email, first name or last name.
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    #[schema(example = "Jane")]
    pub first_name: Option<String>,

    #[schema(example = "Doe")]
    pub last_name: Option<String>,

    #[schema(example = "+33 6 12 34 56 78")]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    #[validate(custom(function = "money"))]
    #[schema(value_type = String, example = "25.00")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub phone_number: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    #[validate(custom(function = "money"))]
    #[schema(value_type = String, example = "25.00")]
    pub balance: Decimal,
}
