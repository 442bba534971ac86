use crate::{
    abstract_trait::user::repository::UserQueryRepositoryTrait, domain::requests::FindAllUsers,
    model::User as UserModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_all(&self, req: &FindAllUsers) -> Result<Vec<UserModel>, RepositoryError> {
        info!("🔍 Fetching users with search: {:?}", req.search);

        let search = req
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let users = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT user_id, email, first_name, last_name, phone_number, role, balance,
                   created_at, updated_at
            FROM users
            WHERE ($1::TEXT IS NULL
                   OR email ILIKE '%' || $1 || '%'
                   OR first_name ILIKE '%' || $1 || '%'
                   OR last_name ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR role = $2)
            ORDER BY user_id
            "#,
        )
        .bind(search)
        .bind(req.role.map(|r| r.as_str()))
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch users: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT user_id, email, first_name, last_name, phone_number, role, balance,
                   created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<UserModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT user_id, email, first_name, last_name, phone_number, role, balance,
                   created_at, updated_at
            FROM users
            WHERE user_id = ANY($1)
            ORDER BY user_id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch users {:?}: {:?}", ids, e);
            RepositoryError::from(e)
        })?;

        Ok(users)
    }
}
