use crate::{
    domain::requests::{CreateOrderDetailRecordRequest, OrderProductRequest},
    model::{Product, User, UserRole},
};
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::collections::HashMap;

/// Trainers pay the trainer price whenever the product has one, even zero.
pub fn unit_price_for(role: UserRole, product: &Product) -> Decimal {
    match (role, product.trainer_price) {
        (UserRole::Trainer, Some(trainer_price)) => trainer_price,
        _ => product.price,
    }
}

#[derive(Debug, Clone)]
pub struct Quote {
    pub lines: Vec<CreateOrderDetailRecordRequest>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Prices every requested line for `client`, in request order.
///
/// `products` must hold every requested product; a missing one is reported
/// as inactive. Stock is checked line by line and the first shortfall wins.
pub fn quote_order(
    client: &User,
    items: &[OrderProductRequest],
    products: &HashMap<i32, Product>,
    discount: Decimal,
) -> Result<Quote, ServiceError> {
    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;

    for item in items {
        let product = products
            .get(&item.product_id)
            .ok_or_else(|| ServiceError::InactiveProducts(vec![item.product_id]))?;

        if product.quantity < item.quantity {
            return Err(ServiceError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity,
                requested: item.quantity,
            });
        }

        let unit_price = unit_price_for(client.role, product);
        let total_price = unit_price * Decimal::from(item.quantity);
        subtotal += total_price;

        lines.push(CreateOrderDetailRecordRequest {
            product_id: product.product_id,
            product_name: product.name.clone(),
            product_description: product.description.clone(),
            quantity: item.quantity,
            unit_price,
            total_price,
        });
    }

    let total = (subtotal - discount).max(Decimal::ZERO);

    Ok(Quote {
        lines,
        subtotal,
        discount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, quantity: i32, price: i64, trainer_price: Option<i64>) -> Product {
        Product {
            product_id: id,
            name: format!("Product {id}"),
            description: None,
            quantity,
            price: Decimal::new(price, 2),
            trainer_price: trainer_price.map(|p| Decimal::new(p, 2)),
            cost: Decimal::ZERO,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn client(role: UserRole) -> User {
        User {
            user_id: 1,
            email: "member@gym.test".into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            role,
            balance: Decimal::ZERO,
            created_at: None,
            updated_at: None,
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<i32, Product> {
        products.into_iter().map(|p| (p.product_id, p)).collect()
    }

    fn item(product_id: i32, quantity: i32) -> OrderProductRequest {
        OrderProductRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn trainer_price_applies_only_to_trainers() {
        let whey = product(1, 10, 3990, Some(3490));
        assert_eq!(
            unit_price_for(UserRole::Trainer, &whey),
            Decimal::new(3490, 2)
        );
        assert_eq!(unit_price_for(UserRole::User, &whey), Decimal::new(3990, 2));
    }

    #[test]
    fn trainer_without_trainer_price_pays_public_price() {
        let towel = product(2, 10, 1200, None);
        assert_eq!(
            unit_price_for(UserRole::Trainer, &towel),
            Decimal::new(1200, 2)
        );
    }

    #[test]
    fn zero_trainer_price_is_honoured() {
        let sample = product(3, 10, 500, Some(0));
        assert_eq!(unit_price_for(UserRole::Trainer, &sample), Decimal::ZERO);
    }

    #[test]
    fn totals_sum_lines_and_subtract_discount() {
        let products = catalog(vec![product(1, 10, 1000, None), product(2, 10, 250, None)]);
        let quote = quote_order(
            &client(UserRole::User),
            &[item(1, 2), item(2, 4)],
            &products,
            Decimal::new(500, 2),
        )
        .unwrap();

        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].total_price, Decimal::new(2000, 2));
        assert_eq!(quote.lines[1].total_price, Decimal::new(1000, 2));
        assert_eq!(quote.subtotal, Decimal::new(3000, 2));
        assert_eq!(quote.total, Decimal::new(2500, 2));
    }

    #[test]
    fn discount_larger_than_subtotal_floors_at_zero() {
        let products = catalog(vec![product(1, 10, 1000, None)]);
        let quote = quote_order(
            &client(UserRole::User),
            &[item(1, 1)],
            &products,
            Decimal::new(5000, 2),
        )
        .unwrap();
        assert_eq!(quote.total, Decimal::ZERO);
    }

    #[test]
    fn shortfall_reports_name_and_counts() {
        let products = catalog(vec![product(1, 3, 1000, None)]);
        let err = quote_order(
            &client(UserRole::User),
            &[item(1, 5)],
            &products,
            Decimal::ZERO,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Insufficient stock for product: Product 1. Available: 3, Requested: 5"
        );
    }

    #[test]
    fn lines_keep_request_order() {
        let products = catalog(vec![product(1, 10, 100, None), product(2, 10, 200, None)]);
        let quote = quote_order(
            &client(UserRole::User),
            &[item(2, 1), item(1, 1)],
            &products,
            Decimal::ZERO,
        )
        .unwrap();
        let ids: Vec<i32> = quote.lines.iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
