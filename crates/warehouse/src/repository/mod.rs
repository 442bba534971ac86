mod order;
mod product;
mod user;


pub use self::order::{OrderCommandRepository, OrderQueryRepository};
pub use self::product::{ProductCommandRepository, ProductQueryRepository};
pub use self::user::{UserCommandRepository, UserQueryRepository};
