use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[source] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Custom: {0}")]
    Custom(String),
}

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Classifies constraint failures so callers can tell a duplicate email from
/// a product still referenced by order lines.
impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(db_err) => {
                let constraint = db_err
                    .constraint()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| db_err.message().to_string());

                let transient = matches!(
                    db_err.code().as_deref(),
                    Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
                );

                if transient {
                    RepositoryError::Conflict(format!(
                        "Concurrent update, retry the request: {}",
                        db_err.message()
                    ))
                } else if db_err.is_unique_violation() {
                    RepositoryError::AlreadyExists(constraint)
                } else if db_err.is_foreign_key_violation() {
                    RepositoryError::ForeignKey(constraint)
                } else if db_err.is_check_violation() {
                    RepositoryError::Conflict(constraint)
                } else {
                    RepositoryError::Sqlx(err)
                }
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}
