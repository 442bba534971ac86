mod command;
pub mod pricing;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::{OrderQueryService, OrderQueryServiceDeps};

use crate::{
    abstract_trait::{
        order::repository::DynOrderQueryRepository, user::repository::DynUserQueryRepository,
    },
    domain::response::OrderResponse,
    model::{Order as OrderModel, OrderDetail as OrderDetailModel, User as UserModel},
};
use shared::errors::ServiceError;
use std::collections::HashMap;

/// Attaches client summaries and lines to each order, keeping the given order.
pub(crate) async fn hydrate_orders(
    orders: Vec<OrderModel>,
    order_query: &DynOrderQueryRepository,
    user_query: &DynUserQueryRepository,
) -> Result<Vec<OrderResponse>, ServiceError> {
    let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();

    let mut client_ids: Vec<i32> = orders.iter().map(|o| o.client_id).collect();
    client_ids.sort_unstable();
    client_ids.dedup();

    let mut lines: HashMap<i32, Vec<OrderDetailModel>> = HashMap::new();
    for detail in order_query.find_details(&order_ids).await? {
        lines.entry(detail.order_id).or_default().push(detail);
    }

    let clients: HashMap<i32, UserModel> = user_query
        .find_by_ids(&client_ids)
        .await?
        .into_iter()
        .map(|u| (u.user_id, u))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let client = clients.get(&order.client_id).cloned();
            let details = lines.remove(&order.order_id).unwrap_or_default();
            OrderResponse::from_parts(order, client, details)
        })
        .collect())
}
