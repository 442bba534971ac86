use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Qrcode,
    Cash,
    Creditcard,
    AccountDebit,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Qrcode => "QRCODE",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Creditcard => "CREDITCARD",
            PaymentMethod::AccountDebit => "ACCOUNT_DEBIT",
        }
    }

    /// Account debits move money on the client's stored balance.
    pub fn touches_balance(self) -> bool {
        matches!(self, PaymentMethod::AccountDebit)
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "QRCODE" => Ok(PaymentMethod::Qrcode),
            "CASH" => Ok(PaymentMethod::Cash),
            "CREDITCARD" => Ok(PaymentMethod::Creditcard),
            "ACCOUNT_DEBIT" => Ok(PaymentMethod::AccountDebit),
            _ => Err(UnknownVariant::new("payment method", value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub client_id: i32,
    pub total_amount: Decimal,
    pub discount: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Order {
    /// Refunds are stored as orders carrying a negative total.
    pub fn is_refund(&self) -> bool {
        self.total_amount < Decimal::ZERO
    }
}
