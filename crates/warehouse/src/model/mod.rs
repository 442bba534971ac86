mod order;
mod order_detail;
mod product;
mod user;

pub use self::order::{Order, PaymentMethod};
pub use self::order_detail::OrderDetail;
pub use self::product::Product;
pub use self::user::{User, UserRole};

use thiserror::Error;

/// A text column held a value outside the enum's check constraint.
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: String) -> Self {
        Self { kind, value }
    }
}
