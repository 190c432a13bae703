use async_trait::async_trait;
use sqlx::PgPool;

use super::{CrudRepository, Page};
use crate::database::errors::{DbError, DbResult};
use crate::database::models::{Category, CategoryInput};

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository for PgCategoryRepository {
    type Entity = Category;
    type Detail = Category;
    type Input = CategoryInput;

    async fn list(&self, page: Page) -> DbResult<(Vec<Category>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, category_name, description
            FROM categories
            ORDER BY category_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((categories, total))
    }

    async fn get(&self, id: i32) -> DbResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, category_name, description
            FROM categories
            WHERE category_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create(&self, input: &CategoryInput) -> DbResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_name, description)
            VALUES ($1, $2)
            RETURNING category_id, category_name, description
            "#,
        )
        .bind(&input.category_name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created category {}", category.category_id);
        Ok(category)
    }

    async fn update(&self, id: i32, input: &CategoryInput) -> DbResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET category_name = $1, description = $2
            WHERE category_id = $3
            RETURNING category_id, category_name, description
            "#,
        )
        .bind(&input.category_name)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
