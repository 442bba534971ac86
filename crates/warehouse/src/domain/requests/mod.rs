mod order;
mod product;
mod refund;
mod user;

pub use self::order::{
    CancelOrderRecordRequest, CancelOrderRequest, CreateOrderDetailRecordRequest,
    CreateOrderRecordRequest, CreateOrderRequest, FindAllOrders, OrderProductRequest,
    UpdateOrderNotesRequest,
};
pub use self::product::{
    AdjustStockRequest, CreateProductRequest, FindAllProducts, UpdateProductRequest,
};
pub use self::refund::{CreateRefundRecordRequest, CreateRefundRequest};
pub use self::user::{CreateUserRequest, FindAllUsers, UpdateUserRequest};

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Money columns are `NUMERIC(12, 2)`; anything finer would be rounded by
/// Postgres independently on each write.
const MONEY_SCALE: u32 = 2;

pub(crate) fn money(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > MONEY_SCALE {
        let mut err = ValidationError::new("scale");
        err.message = Some("Amount cannot have more than 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("Amount cannot be negative".into());
        return Err(err);
    }
    money(value)
}

pub(crate) fn strictly_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("Amount must be greater than zero".into());
        return Err(err);
    }
    money(value)
}

/// Flattens nested validation errors into `(path, message)` pairs, e.g.
/// `("products[0].quantity", "Quantity must be at least 1")`.
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect_messages("", errors, &mut out);
    out.sort();
    out
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| match error.code.as_ref() {
                            "email" => "Invalid email format".to_string(),
                            "length" => "Invalid length".to_string(),
                            "range" => "Value out of range".to_string(),
                            _ => format!("Invalid {field}"),
                        });
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}
