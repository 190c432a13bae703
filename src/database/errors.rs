use thiserror::Error;

/// Store-level failures that callers can act on.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("entity not found")]
    NotFound,

    #[error("unique constraint violation")]
    UniqueViolation { constraint: Option<String> },

    #[error("foreign key constraint violation")]
    ForeignKeyViolation { constraint: Option<String> },

    #[error(transparent)]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation {
                    constraint: db_err.constraint().map(str::to_string),
                }
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::ForeignKeyViolation {
                    constraint: db_err.constraint().map(str::to_string),
                }
            }
            _ => DbError::Other(err),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
