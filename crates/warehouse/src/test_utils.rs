//! In-memory repositories for service and handler tests.

use crate::{
    abstract_trait::{
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        product::repository::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
        user::repository::{UserCommandRepositoryTrait, UserQueryRepositoryTrait},
    },
    di::Repositories,
    domain::requests::{
        CancelOrderRecordRequest, CreateOrderRecordRequest, CreateProductRequest,
        CreateRefundRecordRequest, CreateUserRequest, FindAllOrders, FindAllProducts,
        FindAllUsers, UpdateProductRequest, UpdateUserRequest,
    },
    model::{Order, OrderDetail, PaymentMethod, Product, User, UserRole},
    state::AppState,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    details: Vec<OrderDetail>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// One store behind every repository trait, so services see each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            user_query: Arc::new(self.clone()),
            user_command: Arc::new(self.clone()),
            product_query: Arc::new(self.clone()),
            product_command: Arc::new(self.clone()),
            order_query: Arc::new(self.clone()),
            order_command: Arc::new(self.clone()),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::from_repositories(self.repositories(), "test", "http://localhost:5173")
    }

    pub fn add_user(&self, email: &str, role: UserRole, balance: Decimal) -> User {
        let mut t = self.lock();
        let user = User {
            user_id: t.next_id(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            role,
            balance,
            created_at: None,
            updated_at: None,
        };
        t.users.push(user.clone());
        user
    }

    pub fn add_product(
        &self,
        name: &str,
        quantity: i32,
        price: Decimal,
        trainer_price: Option<Decimal>,
    ) -> Product {
        let mut t = self.lock();
        let product = Product {
            product_id: t.next_id(),
            name: name.to_string(),
            description: None,
            quantity,
            price,
            trainer_price,
            cost: Decimal::ZERO,
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        t.products.push(product.clone());
        product
    }

    pub fn deactivate(&self, product_id: i32) {
        if let Some(p) = self
            .lock()
            .products
            .iter_mut()
            .find(|p| p.product_id == product_id)
        {
            p.is_active = false;
        }
    }

    pub fn user(&self, id: i32) -> User {
        self.lock()
            .users
            .iter()
            .find(|u| u.user_id == id)
            .cloned()
            .unwrap()
    }

    pub fn product(&self, id: i32) -> Product {
        self.lock()
            .products
            .iter()
            .find(|p| p.product_id == id)
            .cloned()
            .unwrap()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn detail_count(&self) -> usize {
        self.lock().details.len()
    }
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

#[async_trait]
impl UserQueryRepositoryTrait for InMemoryStore {
    async fn find_all(&self, req: &FindAllUsers) -> Result<Vec<User>, RepositoryError> {
        let search = req.search.as_deref().filter(|s| !s.trim().is_empty());
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| {
                search.is_none_or(|s| {
                    contains(Some(&u.email), s)
                        || contains(u.first_name.as_deref(), s)
                        || contains(u.last_name.as_deref(), s)
                })
            })
            .filter(|u| req.role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.iter().find(|u| u.user_id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| ids.contains(&u.user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for InMemoryStore {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<User, RepositoryError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == req.email) {
            return Err(RepositoryError::AlreadyExists("users_email_key".into()));
        }
        let user = User {
            user_id: t.next_id(),
            email: req.email.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            phone_number: req.phone_number.clone(),
            role: req.role,
            balance: req.balance,
            created_at: None,
            updated_at: None,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i32, req: &UpdateUserRequest) -> Result<User, RepositoryError> {
        let mut t = self.lock();
        let user = t
            .users
            .iter_mut()
            .find(|u| u.user_id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.email = req.email.clone();
        user.first_name = req.first_name.clone();
        user.last_name = req.last_name.clone();
        user.phone_number = req.phone_number.clone();
        user.role = req.role;
        user.balance = req.balance;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i32) -> Result<(), RepositoryError> {
        let mut t = self.lock();
        if t.orders.iter().any(|o| o.client_id == id) {
            return Err(RepositoryError::ForeignKey("orders_client_id_fkey".into()));
        }
        let before = t.users.len();
        t.users.retain(|u| u.user_id != id);
        if t.users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn find_all(&self, req: &FindAllProducts) -> Result<Vec<Product>, RepositoryError> {
        let search = req.search.as_deref().filter(|s| !s.trim().is_empty());
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| {
                search.is_none_or(|s| {
                    contains(Some(&p.name), s) || contains(p.description.as_deref(), s)
                })
            })
            .filter(|p| req.active.is_none_or(|a| p.is_active == a))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .iter()
            .find(|p| p.product_id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| ids.contains(&p.product_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError> {
        let mut t = self.lock();
        let product = Product {
            product_id: t.next_id(),
            name: req.name.clone(),
            description: req.description.clone(),
            quantity: req.quantity,
            price: req.price,
            trainer_price: req.trainer_price,
            cost: req.cost,
            is_active: req.is_active,
            created_at: None,
            updated_at: None,
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<Product, RepositoryError> {
        let mut t = self.lock();
        let product = t
            .products
            .iter_mut()
            .find(|p| p.product_id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.name = req.name.clone();
        product.description = req.description.clone();
        product.quantity = req.quantity;
        product.price = req.price;
        product.trainer_price = req.trainer_price;
        product.cost = req.cost;
        product.is_active = req.is_active;
        Ok(product.clone())
    }

    async fn adjust_stock(&self, id: i32, delta: i32) -> Result<Product, RepositoryError> {
        let mut t = self.lock();
        let product = t
            .products
            .iter_mut()
            .find(|p| p.product_id == id)
            .ok_or(RepositoryError::NotFound)?;
        if product.quantity + delta < 0 {
            return Err(RepositoryError::Conflict("stock below zero".into()));
        }
        product.quantity += delta;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut t = self.lock();
        if t.details.iter().any(|d| d.product_id == id) {
            return Err(RepositoryError::ForeignKey(
                "order_details_product_id_fkey".into(),
            ));
        }
        let before = t.products.len();
        t.products.retain(|p| p.product_id != id);
        if t.products.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_all(&self, req: &FindAllOrders) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|o| req.client_id.is_none_or(|c| o.client_id == c))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock().orders.iter().find(|o| o.order_id == id).cloned())
    }

    async fn find_by_client(&self, client_id: i32) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect();
        orders.reverse();
        Ok(orders)
    }

    async fn find_details(&self, order_ids: &[i32]) -> Result<Vec<OrderDetail>, RepositoryError> {
        Ok(self
            .lock()
            .details
            .iter()
            .filter(|d| order_ids.contains(&d.order_id))
            .cloned()
            .collect())
    }
}

/// Mirrors the guarded SQL: every check runs before any write.
#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(Order, Vec<OrderDetail>), RepositoryError> {
        let mut t = self.lock();

        for line in &req.lines {
            let product = t
                .products
                .iter()
                .find(|p| p.product_id == line.product_id)
                .ok_or_else(|| RepositoryError::ForeignKey("order_details_product_id_fkey".into()))?;
            if product.quantity < line.quantity {
                return Err(RepositoryError::Conflict(format!(
                    "Stock of product {} changed during the order",
                    line.product_id
                )));
            }
        }

        let debit = req.balance_debit();
        let client = t
            .users
            .iter()
            .find(|u| u.user_id == req.client_id)
            .ok_or_else(|| RepositoryError::ForeignKey("orders_client_id_fkey".into()))?;
        if debit > Decimal::ZERO && client.balance < debit {
            return Err(RepositoryError::Conflict(format!(
                "Balance of user {} changed during the order",
                req.client_id
            )));
        }

        let order = Order {
            order_id: t.next_id(),
            client_id: req.client_id,
            total_amount: req.total_amount,
            discount: req.discount,
            payment_method: req.payment_method,
            notes: req.notes.clone(),
            created_at: None,
            updated_at: None,
        };
        t.orders.push(order.clone());

        let mut details = Vec::new();
        for line in &req.lines {
            if let Some(p) = t
                .products
                .iter_mut()
                .find(|p| p.product_id == line.product_id)
            {
                p.quantity -= line.quantity;
            }
            let detail = OrderDetail {
                order_detail_id: t.next_id(),
                order_id: order.order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                product_name: line.product_name.clone(),
                product_description: line.product_description.clone(),
            };
            t.details.push(detail.clone());
            details.push(detail);
        }

        if let Some(u) = t.users.iter_mut().find(|u| u.user_id == req.client_id) {
            u.balance -= debit;
        }

        Ok((order, details))
    }

    async fn update_notes(&self, id: i32, notes: Option<&str>) -> Result<Order, RepositoryError> {
        let mut t = self.lock();
        let order = t
            .orders
            .iter_mut()
            .find(|o| o.order_id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.notes = notes.map(str::to_string);
        Ok(order.clone())
    }

    async fn cancel_order(
        &self,
        req: &CancelOrderRecordRequest,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let mut t = self.lock();
        if !t.orders.iter().any(|o| o.order_id == req.order_id) {
            return Err(RepositoryError::NotFound);
        }

        let details: Vec<OrderDetail> = t
            .details
            .iter()
            .filter(|d| d.order_id == req.order_id)
            .cloned()
            .collect();

        if req.restore_stock {
            for line in &details {
                if let Some(p) = t
                    .products
                    .iter_mut()
                    .find(|p| p.product_id == line.product_id)
                {
                    p.quantity += line.quantity;
                }
            }
        }

        if let Some(u) = t.users.iter_mut().find(|u| u.user_id == req.client_id) {
            u.balance += req.balance_credit;
        }

        t.details.retain(|d| d.order_id != req.order_id);
        t.orders.retain(|o| o.order_id != req.order_id);

        Ok(details)
    }

    async fn create_refund(&self, req: &CreateRefundRecordRequest) -> Result<Order, RepositoryError> {
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.user_id == req.client_id) {
            return Err(RepositoryError::ForeignKey("orders_client_id_fkey".into()));
        }

        let order = Order {
            order_id: t.next_id(),
            client_id: req.client_id,
            total_amount: -req.amount,
            discount: Decimal::ZERO,
            payment_method: PaymentMethod::AccountDebit,
            notes: Some(req.notes.clone()),
            created_at: None,
            updated_at: None,
        };
        t.orders.push(order.clone());

        if let Some(u) = t.users.iter_mut().find(|u| u.user_id == req.client_id) {
            u.balance += req.amount;
        }

        Ok(order)
    }
}
