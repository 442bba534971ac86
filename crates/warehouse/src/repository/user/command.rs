use crate::{
    abstract_trait::user::repository::UserCommandRepositoryTrait,
    domain::requests::{CreateUserRequest, UpdateUserRequest},
    model::User as UserModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (email, first_name, last_name, phone_number, role, balance)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, email, first_name, last_name, phone_number, role, balance,
                      created_at, updated_at
            "#,
        )
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone_number)
        .bind(req.role.as_str())
        .bind(req.balance)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to create user {}: {:?}", req.email, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Created user ID {} ({})", user.user_id, user.email);
        Ok(user)
    }

    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<UserModel, RepositoryError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET email = $2,
                first_name = $3,
                last_name = $4,
                phone_number = $5,
                role = $6,
                balance = $7,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $1
            RETURNING user_id, email, first_name, last_name, phone_number, role, balance,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone_number)
        .bind(req.role.as_str())
        .bind(req.balance)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update user {}: {:?}", id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated user ID {}", user.user_id);
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete user {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            info!("⚠️ No user found to delete with ID {}", id);
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted user ID {}", id);
        Ok(())
    }
}
