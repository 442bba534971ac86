use crate::{
    abstract_trait::user::{
        repository::DynUserCommandRepository, service::UserCommandServiceTrait,
    },
    domain::{
        requests::{CreateUserRequest, UpdateUserRequest},
        response::UserResponse,
    },
    service::validation_failure,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;
use validator::Validate;

const TRACER: &str = "user-command-service";

#[derive(Clone)]
pub struct UserCommandService {
    command: DynUserCommandRepository,
    metrics: Metrics,
}

impl UserCommandService {
    pub fn new(command: DynUserCommandRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "user_command_service");

        Self { command, metrics }
    }
}

fn user_not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("User not found".into()),
        other => ServiceError::Repo(other),
    }
}

#[async_trait]
impl UserCommandServiceTrait for UserCommandService {
    async fn create_user(
        &self,
        req: &CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("👤 Creating user: {}", req.email);

        let method = Method::Post;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "create_user",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("operation", "create"),
            ],
        );

        if let Err(errors) = req.validate() {
            tracing_ctx.failure(&self.metrics, method, "Invalid user payload");
            return Err(validation_failure(&errors));
        }

        match self.command.create_user(req).await {
            Ok(user) => {
                tracing_ctx.success(&self.metrics, method, "User created");
                Ok(ApiResponse::success(
                    "User created successfully",
                    UserResponse::from(user),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("✏️ Updating user ID={id}");

        let method = Method::Put;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "update_user",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("operation", "update"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        if let Err(errors) = req.validate() {
            tracing_ctx.failure(&self.metrics, method, "Invalid user payload");
            return Err(validation_failure(&errors));
        }

        match self.command.update_user(id, req).await {
            Ok(user) => {
                tracing_ctx.success(&self.metrics, method, "User updated");
                Ok(ApiResponse::success(
                    "User updated successfully",
                    UserResponse::from(user),
                ))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(user_not_found(err))
            }
        }
    }

    async fn delete_user(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting user ID={id}");

        let method = Method::Delete;
        let tracing_ctx = TracingContext::start(
            TRACER,
            "delete_user",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        match self.command.delete_user(id).await {
            Ok(()) => {
                tracing_ctx.success(&self.metrics, method, "User deleted");
                Ok(ApiResponse::success("User deleted successfully", ()))
            }
            Err(err) => {
                tracing_ctx.failure(&self.metrics, method, &err.to_string());
                Err(user_not_found(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        di::DependenciesInject,
        domain::requests::{CreateUserRequest, UpdateUserRequest},
        model::UserRole,
        test_utils::InMemoryStore,
    };
    use prometheus_client::registry::Registry;
    use rust_decimal::Decimal;
    use shared::errors::{RepositoryError, ServiceError};

    fn new_user(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            first_name: Some("Jane".into()),
            last_name: None,
            phone_number: None,
            role: UserRole::Trainer,
            balance: Decimal::new(2500, 2),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_already_exists() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());

        let created = di
            .user_command
            .create_user(&new_user("jane@gym.test"))
            .await
            .unwrap()
            .data;
        assert_eq!(created.role, UserRole::Trainer);
        assert_eq!(created.balance, Decimal::new(2500, 2));

        let err = di
            .user_command
            .create_user(&new_user("jane@gym.test"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn invalid_email_is_a_validation_error() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());

        let err = di
            .user_command
            .create_user(&new_user("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        let member = store.add_user("old@gym.test", UserRole::User, Decimal::ZERO);

        let updated = di
            .user_command
            .update_user(
                member.user_id,
                &UpdateUserRequest {
                    email: "new@gym.test".into(),
                    first_name: None,
                    last_name: Some("Doe".into()),
                    phone_number: None,
                    role: UserRole::Trainer,
                    balance: Decimal::new(-500, 2),
                },
            )
            .await
            .unwrap()
            .data;

        assert_eq!(updated.email, "new@gym.test");
        assert_eq!(updated.role, UserRole::Trainer);
        assert_eq!(updated.balance, Decimal::new(-500, 2));

        let missing = di.user_command.delete_user(999).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn users_with_orders_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let di =
            DependenciesInject::from_repositories(store.repositories(), &mut Registry::default());
        let member = store.add_user("member@gym.test", UserRole::User, Decimal::ZERO);

        di.refund
            .create_refund(&crate::domain::requests::CreateRefundRequest {
                client_id: member.user_id,
                amount: Decimal::ONE,
                reason: None,
            })
            .await
            .unwrap();

        let err = di.user_command.delete_user(member.user_id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::ForeignKey(_))
        ));
        assert_eq!(store.user(member.user_id).email, "member@gym.test");
    }
}
