mod health;
mod order;
mod product;
mod user;

pub use self::health::HealthResponse;
pub use self::order::{
    ClientSummary, OrderCancellationResponse, OrderLineResponse, OrderResponse,
    OrderSummaryResponse, ProductSummary, RestoredProduct,
};
pub use self::product::ProductResponse;
pub use self::user::{UserResponse, UserWithOrdersResponse};
