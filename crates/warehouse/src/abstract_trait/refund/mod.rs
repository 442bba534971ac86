mod service;

pub use self::service::{DynRefundService, RefundServiceTrait};
