mod order;
mod product;
mod refund;
mod user;

pub use self::order::{
    OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderQueryServiceDeps,
    pricing,
};
pub use self::product::{ProductCommandService, ProductQueryService};
pub use self::refund::{RefundService, RefundServiceDeps};
pub use self::user::{UserCommandService, UserQueryService, UserQueryServiceDeps};

use crate::domain::requests::field_messages;
use shared::errors::ServiceError;
use validator::ValidationErrors;

pub(crate) fn validation_failure(errors: &ValidationErrors) -> ServiceError {
    ServiceError::Validation(
        field_messages(errors)
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect(),
    )
}
