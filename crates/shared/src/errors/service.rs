use crate::errors::repository::RepositoryError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error(
        "Insufficient stock for product: {product}. Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Insufficient balance. Available: {available}, Required: {required}")]
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },

    #[error("Some products not found or inactive: {0:?}")]
    InactiveProducts(Vec<i32>),

    #[error("Internal error: {0}")]
    Internal(String),
}
