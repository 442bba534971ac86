pub mod order;
pub mod product;
pub mod refund;
pub mod user;
