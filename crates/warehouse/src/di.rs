use crate::{
    abstract_trait::{
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
        refund::DynRefundService,
        user::{
            repository::{DynUserCommandRepository, DynUserQueryRepository},
            service::{DynUserCommandService, DynUserQueryService},
        },
    },
    repository::{
        OrderCommandRepository, OrderQueryRepository, ProductCommandRepository,
        ProductQueryRepository, UserCommandRepository, UserQueryRepository,
    },
    service::{
        OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderQueryServiceDeps,
        ProductCommandService, ProductQueryService, RefundService, RefundServiceDeps,
        UserCommandService, UserQueryService, UserQueryServiceDeps,
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

/// Storage seam shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            user_query: Arc::new(UserQueryRepository::new(pool.clone())),
            user_command: Arc::new(UserCommandRepository::new(pool.clone())),
            product_query: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub user_query: DynUserQueryService,
    pub user_command: DynUserCommandService,
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub refund: DynRefundService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("user_query", &"UserQueryService")
            .field("user_command", &"UserCommandService")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .field("refund", &"RefundService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps { pool } = deps;
        Self::from_repositories(Repositories::postgres(pool), registry)
    }

    pub fn from_repositories(repos: Repositories, registry: &mut Registry) -> Self {
        let user_query = UserQueryService::new(
            UserQueryServiceDeps {
                query: repos.user_query.clone(),
                orders: repos.order_query.clone(),
            },
            registry,
        );

        let user_command = UserCommandService::new(repos.user_command.clone(), registry);

        let product_query = ProductQueryService::new(repos.product_query.clone(), registry);

        let product_command = ProductCommandService::new(
            repos.product_query.clone(),
            repos.product_command.clone(),
            registry,
        );

        let order_query = OrderQueryService::new(
            OrderQueryServiceDeps {
                query: repos.order_query.clone(),
                user_query: repos.user_query.clone(),
            },
            registry,
        );

        let order_command = OrderCommandService::new(
            OrderCommandServiceDeps {
                command: repos.order_command.clone(),
                query: repos.order_query.clone(),
                user_query: repos.user_query.clone(),
                product_query: repos.product_query.clone(),
            },
            registry,
        );

        let refund = RefundService::new(
            RefundServiceDeps {
                command: repos.order_command,
                user_query: repos.user_query,
            },
            registry,
        );

        Self {
            user_query: Arc::new(user_query),
            user_command: Arc::new(user_command),
            product_query: Arc::new(product_query),
            product_command: Arc::new(product_command),
            order_query: Arc::new(order_query),
            order_command: Arc::new(order_command),
            refund: Arc::new(refund),
        }
    }
}
