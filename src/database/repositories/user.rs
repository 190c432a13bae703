use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::errors::{DbError, DbResult};
use crate::database::models::{NewUser, UserEntity};

const USER_COLUMNS: &str =
    "user_id, username, email, password_hash, role, is_active, employee_id, created_at, updated_at";

/// Credential store used by the auth flow.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Matches either the username or the email.
    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<UserEntity>>;

    async fn find_by_id(&self, user_id: i32) -> DbResult<Option<UserEntity>>;

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserEntity>>;

    async fn username_exists(&self, username: &str) -> DbResult<bool>;

    async fn email_exists(&self, email: &str) -> DbResult<bool>;

    async fn create(&self, user: NewUser) -> DbResult<UserEntity>;

    async fn update_password(&self, user_id: i32, password_hash: &str) -> DbResult<()>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<UserEntity>> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1 LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> DbResult<Option<UserEntity>> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserEntity>> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> DbResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create(&self, user: NewUser) -> DbResult<UserEntity> {
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role, is_active, employee_id)
            VALUES ($1, $2, $3, $4, true, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.employee_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Created user {}", user.user_id);
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Failed to create user: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn update_password(&self, user_id: i32, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, updated_at = NOW()
            WHERE user_id = $2
            "#,
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
